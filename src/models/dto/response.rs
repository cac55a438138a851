use serde::Serialize;
use uuid::Uuid;

use crate::models::domain::{Difficulty, Notice, Question, QuizConfiguration};
use crate::services::quiz_session::{AdvanceOutcome, Progress, QuizController, QuizState};

/// A question as shown while it is being answered: correctness flags stay
/// on the server.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub question_text: String,
    pub language: String,
    pub difficulty: Difficulty,
    pub choices: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            question_text: question.question_text.clone(),
            language: question.language.clone(),
            difficulty: question.difficulty,
            choices: question.choices.iter().map(|c| c.text.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSessionView {
    pub session_id: Uuid,
    pub state: QuizState,
    pub configuration: QuizConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_configuration: Option<QuizConfiguration>,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_choice: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_message: Option<String>,
}

impl QuizSessionView {
    pub fn from_controller(session_id: Uuid, controller: &QuizController) -> Self {
        QuizSessionView {
            session_id,
            state: controller.state(),
            configuration: controller.configuration().clone(),
            active_configuration: controller.active_configuration(),
            languages: controller.languages().to_vec(),
            progress: controller.progress(),
            current_question: controller.current_question().map(QuestionView::from),
            selected_choice: controller.selected_answer(),
            notice: controller.notice().cloned(),
            notice_message: controller.notice().map(|n| n.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvanceResponse {
    #[serde(flatten)]
    pub outcome: AdvanceOutcome,
    pub session: QuizSessionView,
}
