use serde::{Deserialize, Serialize};

use crate::models::domain::{question::Difficulty, score::Feedback, ScoreSummary};

/// The reviewable outcome of a finished quiz session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizReview {
    pub score: ScoreSummary,
    pub elapsed_seconds: u64,
    pub time_spent: String,
    pub seconds_per_question: u64,
    pub feedback: Feedback,
    pub feedback_message: String,
    pub entries: Vec<ReviewEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewEntry {
    pub position: usize, // 1-based
    pub question_id: String,
    pub question_text: String,
    pub difficulty: Difficulty,
    pub selected_choice: Option<usize>,
    pub correct_choice: Option<usize>,
    pub is_correct: bool,
    pub choices: Vec<ReviewChoice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewChoice {
    pub text: String,
    pub is_correct: bool,
    pub selected: bool,
}
