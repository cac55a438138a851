use std::collections::HashMap;

use crate::models::domain::{
    score::{format_time_spent, seconds_per_question, Feedback},
    Question, QuizReview, ReviewChoice, ReviewEntry, ScoreSummary,
};

pub struct GradingService;

impl GradingService {
    /// A question counts as correct when the selected choice is flagged
    /// correct. No selection, or an index past the last choice, is incorrect.
    pub fn grade_question(question: &Question, selected: Option<usize>) -> bool {
        selected
            .map(|index| question.is_correct_choice(index))
            .unwrap_or(false)
    }

    /// Score a set of questions against the recorded answers, keyed by
    /// question id.
    pub fn score(questions: &[Question], answers: &HashMap<String, usize>) -> ScoreSummary {
        let correct = questions
            .iter()
            .filter(|q| Self::grade_question(q, answers.get(&q.id).copied()))
            .count();

        ScoreSummary::new(correct, questions.len())
    }

    /// Assemble the result review shown once a session is finished.
    pub fn build_review(
        questions: &[Question],
        answers: &HashMap<String, usize>,
        elapsed_seconds: u64,
    ) -> QuizReview {
        let score = Self::score(questions, answers);
        let feedback = Feedback::for_percentage(score.percentage.unwrap_or(0));

        let entries = questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = answers.get(&question.id).copied();
                ReviewEntry {
                    position: index + 1,
                    question_id: question.id.clone(),
                    question_text: question.question_text.clone(),
                    difficulty: question.difficulty,
                    selected_choice: selected,
                    correct_choice: question.correct_choice_index(),
                    is_correct: Self::grade_question(question, selected),
                    choices: question
                        .choices
                        .iter()
                        .enumerate()
                        .map(|(choice_index, choice)| ReviewChoice {
                            text: choice.text.clone(),
                            is_correct: choice.is_correct,
                            selected: selected == Some(choice_index),
                        })
                        .collect(),
                }
            })
            .collect();

        QuizReview {
            score,
            elapsed_seconds,
            time_spent: format_time_spent(elapsed_seconds),
            seconds_per_question: seconds_per_question(elapsed_seconds, score.total),
            feedback,
            feedback_message: feedback.message().to_string(),
            entries,
        }
    }
}
