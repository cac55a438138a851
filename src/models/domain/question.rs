use serde::{Deserialize, Serialize};

/// One answerable option of a [`Question`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice {
    pub text: String,
    pub is_correct: bool,
}

impl Choice {
    pub fn new(text: &str, is_correct: bool) -> Self {
        Choice {
            text: text.to_string(),
            is_correct,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A quiz item as served by the question repository.
///
/// Questions reaching the session controller always carry at least two
/// choices with at least one of them marked correct.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub question_text: String,
    pub language: String, // topic tag, not the display locale
    pub difficulty: Difficulty,
    pub choices: Vec<Choice>,
}

impl Question {
    /// Whether `choice_index` points at a choice flagged correct. Out of range
    /// indices are simply wrong.
    pub fn is_correct_choice(&self, choice_index: usize) -> bool {
        self.choices
            .get(choice_index)
            .map(|c| c.is_correct)
            .unwrap_or(false)
    }

    /// Index of the first correct choice.
    pub fn correct_choice_index(&self) -> Option<usize> {
        self.choices.iter().position(|c| c.is_correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            id: "q-1".to_string(),
            question_text: "Which keyword declares a constant?".to_string(),
            language: "JavaScript".to_string(),
            difficulty: Difficulty::Easy,
            choices: vec![
                Choice::new("var", false),
                Choice::new("const", true),
                Choice::new("let", false),
            ],
        }
    }

    #[test]
    fn is_correct_choice_checks_flag_and_bounds() {
        let question = sample_question();

        assert!(question.is_correct_choice(1));
        assert!(!question.is_correct_choice(0));
        assert!(!question.is_correct_choice(42));
    }

    #[test]
    fn correct_choice_index_returns_first_correct() {
        let mut question = sample_question();
        question.choices.push(Choice::new("readonly const", true));

        assert_eq!(question.correct_choice_index(), Some(1));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!(Difficulty::parse("Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse(" hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("expert"), None);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).expect("difficulty should serialize");
        assert_eq!(json, "\"medium\"");
    }
}
