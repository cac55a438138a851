use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;

/// The question counts a learner may pick from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum QuestionCount {
    Five,
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl QuestionCount {
    pub const ALL: [QuestionCount; 5] = [
        QuestionCount::Five,
        QuestionCount::Ten,
        QuestionCount::Twenty,
        QuestionCount::Fifty,
        QuestionCount::Hundred,
    ];

    pub fn get(self) -> usize {
        match self {
            QuestionCount::Five => 5,
            QuestionCount::Ten => 10,
            QuestionCount::Twenty => 20,
            QuestionCount::Fifty => 50,
            QuestionCount::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for QuestionCount {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        QuestionCount::ALL
            .into_iter()
            .find(|c| c.get() == value as usize)
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "question count must be one of 5, 10, 20, 50 or 100 (got {})",
                    value
                ))
            })
    }
}

impl From<QuestionCount> for u32 {
    fn from(count: QuestionCount) -> Self {
        count.get() as u32
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Parameters staged by the learner before a session starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct QuizConfiguration {
    #[validate(length(min = 1, message = "Please select a language"))]
    pub language: String,

    #[validate(required(message = "Please select the number of questions"))]
    pub requested_count: Option<QuestionCount>,
}

impl QuizConfiguration {
    pub fn new(language: &str, requested_count: Option<QuestionCount>) -> Self {
        QuizConfiguration {
            language: language.trim().to_string(),
            requested_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.language.is_empty() && self.requested_count.is_none()
    }
}
