use serde::Deserialize;

use crate::errors::AppResult;
use crate::models::domain::QuestionCount;

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigureQuizRequest {
    #[serde(default)]
    pub language: String,
    pub question_count: Option<u32>,
}

impl ConfigureQuizRequest {
    /// The requested count, if one was picked. Values outside the allowed
    /// set are a validation error rather than "not picked".
    pub fn question_count(&self) -> AppResult<Option<QuestionCount>> {
        self.question_count.map(QuestionCount::try_from).transpose()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectAnswerRequest {
    pub choice_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_configure_request_with_allowed_count() {
        let request: ConfigureQuizRequest =
            serde_json::from_str(r#"{ "language": "Python", "question_count": 50 }"#)
                .expect("request should parse");

        assert_eq!(request.question_count(), Ok(Some(QuestionCount::Fifty)));
    }

    #[test]
    fn test_configure_request_without_fields() {
        let request: ConfigureQuizRequest =
            serde_json::from_str("{}").expect("request should parse");

        assert_eq!(request.language, "");
        assert_eq!(request.question_count(), Ok(None));
    }

    #[test]
    fn test_configure_request_with_disallowed_count() {
        let request: ConfigureQuizRequest =
            serde_json::from_str(r#"{ "language": "Python", "question_count": 12 }"#)
                .expect("request should parse");

        assert!(matches!(
            request.question_count(),
            Err(AppError::ValidationError(_))
        ));
    }
}
