use std::fmt;

use serde::{Deserialize, Serialize};

/// A message the controller leaves for the presentation layer.
///
/// Notices never block a transition by themselves; they describe why one
/// did not happen or what was adjusted on the way.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    LanguagesUnavailable { message: String },
    ValidationFailed { message: String },
    NoQuestionsAvailable { language: String },
    FetchFailed { message: String },
    InsufficientQuestions {
        language: String,
        available: usize,
        requested: usize,
    },
}

impl Notice {
    /// Whether the notice reports something that kept a session from starting.
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::InsufficientQuestions { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LanguagesUnavailable { message } => {
                write!(f, "Could not load quiz languages: {}", message)
            }
            Notice::ValidationFailed { message } => write!(f, "{}", message),
            Notice::NoQuestionsAvailable { language } => {
                write!(f, "No questions available for {}", language)
            }
            Notice::FetchFailed { message } => {
                write!(f, "Failed to fetch questions: {}", message)
            }
            Notice::InsufficientQuestions {
                language,
                available,
                ..
            } => write!(
                f,
                "Only {} questions are available for {}",
                available, language
            ),
        }
    }
}
