use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{HttpQuestionRepository, QuestionRepository},
    services::quiz_session_service::QuizSessionService,
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_sessions: Arc<QuizSessionService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let repository = Arc::new(HttpQuestionRepository::from_config(&config)?);
        log::info!("Using question API at {}", config.api_url);

        Ok(Self::with_repository(config, repository))
    }

    pub fn with_repository(config: Config, repository: Arc<dyn QuestionRepository>) -> Self {
        let quiz_sessions = Arc::new(QuizSessionService::new(
            repository,
            config.rng_seed,
            config.session_ttl(),
        ));

        Self {
            quiz_sessions,
            config: Arc::new(config),
        }
    }
}
