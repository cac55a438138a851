use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::domain::{Choice, Difficulty, Question};

/// A question as the content API serves it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    #[serde(rename = "_id")]
    #[validate(length(min = 1, message = "Question id is required"))]
    pub id: String,

    #[validate(length(min = 1, message = "Question text is required"))]
    pub question_text: String,

    #[validate(
        length(min = 2, message = "At least 2 choices are required"),
        custom(function = "has_correct_choice"),
        nested
    )]
    pub choices: Vec<ChoiceDto>,

    #[validate(length(min = 1, message = "Language is required"))]
    pub language: String,

    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceDto {
    #[validate(length(min = 1, message = "Choice text is required"))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[allow(clippy::ptr_arg)]
fn has_correct_choice(choices: &Vec<ChoiceDto>) -> Result<(), ValidationError> {
    if choices.iter().any(|c| c.is_correct) {
        Ok(())
    } else {
        let mut err = ValidationError::new("no_correct_choice");
        err.message = Some("At least one choice must be marked as correct".into());
        Err(err)
    }
}

impl TryFrom<QuestionDto> for Question {
    type Error = AppError;

    fn try_from(dto: QuestionDto) -> Result<Self, Self::Error> {
        dto.validate()?;

        let difficulty = Difficulty::parse(&dto.difficulty).ok_or_else(|| {
            AppError::ValidationError(format!("Unknown difficulty '{}'", dto.difficulty))
        })?;

        Ok(Question {
            id: dto.id,
            question_text: dto.question_text,
            language: dto.language,
            difficulty,
            choices: dto
                .choices
                .into_iter()
                .map(|c| Choice {
                    text: c.text,
                    is_correct: c.is_correct,
                })
                .collect(),
        })
    }
}
