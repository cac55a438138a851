use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::{domain::Question, dto::question_dto::QuestionDto},
};

/// Source of quiz questions.
///
/// An empty result is never an error: no languages means no topics are
/// configured, no questions means no content for that language.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn list_languages(&self) -> AppResult<Vec<String>>;
    async fn list_questions_by_language(&self, language: &str) -> AppResult<Vec<Question>>;
}

/// Credentials handed to the HTTP repository when it is built.
#[derive(Clone, Debug, Default)]
pub struct ApiCredentials {
    token: Option<SecretString>,
}

impl ApiCredentials {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn bearer(token: SecretString) -> Self {
        Self { token: Some(token) }
    }

    pub fn is_anonymous(&self) -> bool {
        self.token.is_none()
    }
}

pub struct HttpQuestionRepository {
    client: Client,
    base_url: Url,
    credentials: ApiCredentials,
}

impl HttpQuestionRepository {
    pub fn new(base_url: &str, credentials: ApiCredentials, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::InternalError(format!("Invalid question API url '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::InternalError(format!(
                "Question API url '{}' cannot be used as a base",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let credentials = match &config.api_token {
            Some(token) => ApiCredentials::bearer(token.clone()),
            None => ApiCredentials::anonymous(),
        };
        Self::new(&config.api_url, credentials, config.api_timeout())
    }

    /// Appends `segments` to the base url, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InternalError("Question API url has no path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        log::debug!("GET {}", url);

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.credentials.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            log::error!("Question API request to {} failed: {}", url, e);
            AppError::RepositoryError(format!("Request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Question API returned {} for {}", status, url);
            return Err(AppError::RepositoryError(format!(
                "GET {} returned {}",
                url, status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            log::error!("Failed to decode question API response from {}: {}", url, e);
            AppError::RepositoryError(format!("Invalid response from {}: {}", url, e))
        })
    }
}

/// Converts API records into questions, skipping malformed ones and any
/// record whose id was already seen.
fn usable_questions(dtos: Vec<QuestionDto>) -> Vec<Question> {
    let mut seen = HashSet::new();
    dtos.into_iter()
        .filter_map(|dto| {
            let id = dto.id.clone();
            if seen.contains(&id) {
                log::warn!("Skipping question with repeated id '{}'", id);
                return None;
            }
            match Question::try_from(dto) {
                Ok(question) => {
                    seen.insert(id);
                    Some(question)
                }
                Err(e) => {
                    log::warn!("Skipping malformed question '{}': {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl QuestionRepository for HttpQuestionRepository {
    async fn list_languages(&self) -> AppResult<Vec<String>> {
        let url = self.endpoint(&["questions", "languages"])?;
        let languages: Vec<String> = self.get_json(url).await?;
        Ok(languages)
    }

    async fn list_questions_by_language(&self, language: &str) -> AppResult<Vec<Question>> {
        let url = self.endpoint(&["questions", "language", language])?;
        let dtos: Vec<QuestionDto> = self.get_json(url).await?;
        let fetched = dtos.len();
        let questions = usable_questions(dtos);

        log::info!(
            "Fetched {} questions for {} ({} usable)",
            fetched,
            language,
            questions.len()
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(base: &str) -> HttpQuestionRepository {
        HttpQuestionRepository::new(base, ApiCredentials::anonymous(), Duration::from_secs(1))
            .expect("base url is valid")
    }

    #[test]
    fn endpoint_appends_segments() {
        let repo = repository("https://api.example.com");
        let url = repo
            .endpoint(&["questions", "languages"])
            .expect("endpoint should build");

        assert_eq!(url.as_str(), "https://api.example.com/questions/languages");
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_language() {
        let repo = repository("https://api.example.com/v1/");
        let url = repo
            .endpoint(&["questions", "language", "C#"])
            .expect("endpoint should build");

        assert_eq!(url.as_str(), "https://api.example.com/v1/questions/language/C%23");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result =
            HttpQuestionRepository::new("not a url", ApiCredentials::anonymous(), Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::InternalError(_))));

        let result =
            HttpQuestionRepository::new("mailto:quiz@example.com", ApiCredentials::anonymous(), Duration::from_secs(1));
        assert!(result.is_err());
    }

    #[test]
    fn credentials_from_config() {
        let mut config = Config::test_config();
        assert!(HttpQuestionRepository::from_config(&config)
            .expect("test config is valid")
            .credentials
            .is_anonymous());

        config.api_token = Some(SecretString::from("admin-token".to_string()));
        let repo = HttpQuestionRepository::from_config(&config).expect("test config is valid");
        assert!(!repo.credentials.is_anonymous());
    }

    fn api_question(id: &str, text: &str) -> QuestionDto {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "questionText": text,
            "choices": [
                { "text": "yes", "isCorrect": true },
                { "text": "no", "isCorrect": false }
            ],
            "language": "Go",
            "difficulty": "easy"
        }))
        .expect("api question should parse")
    }

    #[test]
    fn repeated_ids_are_skipped() {
        let questions = usable_questions(vec![
            api_question("go-1", "first copy"),
            api_question("go-2", "another question"),
            api_question("go-1", "second copy"),
        ]);

        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, ["go-1", "go-2"]);
        assert_eq!(questions[0].question_text, "first copy");
    }

    #[test]
    fn malformed_record_does_not_claim_its_id() {
        let mut broken = api_question("go-1", "no choices");
        broken.choices.clear();

        let questions = usable_questions(vec![broken, api_question("go-1", "well formed")]);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_text, "well formed");
    }

    #[tokio::test]
    async fn unreachable_api_is_a_repository_error() {
        let repo = repository("http://127.0.0.1:9");

        let err = repo
            .list_languages()
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, AppError::RepositoryError(_)));
    }
}
