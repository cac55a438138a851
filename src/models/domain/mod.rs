pub mod notice;
pub mod question;
pub mod quiz_config;
pub mod review;
pub mod score;
pub use notice::Notice;
pub use question::{Choice, Difficulty, Question};
pub use quiz_config::{QuestionCount, QuizConfiguration};
pub use review::{QuizReview, ReviewChoice, ReviewEntry};
pub use score::ScoreSummary;
