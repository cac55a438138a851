use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{
    errors::AppResult,
    models::domain::Question,
    repositories::QuestionRepository,
    services::clock::Clock,
};

pub mod fixtures {
    use crate::models::domain::{Choice, Difficulty, Question};

    /// `count` questions tagged `language`, each with four choices of which
    /// the first is correct.
    pub fn question_pool(language: &str, count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| Question {
                id: format!("{}-{}", language.to_lowercase(), i),
                question_text: format!("{} question #{}", language, i),
                language: language.to_string(),
                difficulty: match i % 3 {
                    0 => Difficulty::Easy,
                    1 => Difficulty::Medium,
                    _ => Difficulty::Hard,
                },
                choices: vec![
                    Choice::new("right", true),
                    Choice::new("wrong", false),
                    Choice::new("also wrong", false),
                    Choice::new("still wrong", false),
                ],
            })
            .collect()
    }

    /// A single question whose choices carry the given correctness flags.
    pub fn question_with_choices(id: &str, flags: &[bool]) -> Question {
        Question {
            id: id.to_string(),
            question_text: format!("Question {}", id),
            language: "TypeScript".to_string(),
            difficulty: Difficulty::Medium,
            choices: flags
                .iter()
                .enumerate()
                .map(|(i, correct)| Choice::new(&format!("choice {}", i), *correct))
                .collect(),
        }
    }
}

/// Question repository backed by a map of language to questions.
#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: HashMap<String, Vec<Question>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(language: &str, count: usize) -> Self {
        let mut repo = Self::new();
        repo.insert(fixtures::question_pool(language, count));
        repo
    }

    pub fn insert(&mut self, questions: Vec<Question>) {
        for question in questions {
            self.questions
                .entry(question.language.clone())
                .or_default()
                .push(question);
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn list_languages(&self) -> AppResult<Vec<String>> {
        let mut languages: Vec<String> = self.questions.keys().cloned().collect();
        languages.sort();
        Ok(languages)
    }

    async fn list_questions_by_language(&self, language: &str) -> AppResult<Vec<Question>> {
        Ok(self.questions.get(language).cloned().unwrap_or_default())
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            now: Mutex::new(start),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_fixtures_question_pool() {
        let pool = question_pool("Python", 3);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool[0].id, "python-0");
        assert!(pool.iter().all(|q| q.correct_choice_index() == Some(0)));
    }

    #[tokio::test]
    async fn test_in_memory_repository_filters_by_language() {
        let mut repo = InMemoryQuestionRepository::with_pool("Java", 4);
        repo.insert(question_pool("CSS", 2));

        assert_eq!(
            repo.list_languages().await.expect("languages"),
            vec!["CSS".to_string(), "Java".to_string()]
        );
        assert_eq!(repo.list_questions_by_language("Java").await.expect("questions").len(), 4);
        assert!(repo.list_questions_by_language("Swift").await.expect("questions").is_empty());
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::default();
        let start = clock.now();
        clock.advance(Duration::seconds(90));
        assert_eq!((clock.now() - start).num_seconds(), 90);
    }
}
