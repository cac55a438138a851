pub mod question_repository;

pub use question_repository::{ApiCredentials, HttpQuestionRepository, QuestionRepository};

#[cfg(test)]
pub use question_repository::MockQuestionRepository;
