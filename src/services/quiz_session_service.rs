use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::QuizReview,
        dto::{
            request::ConfigureQuizRequest,
            response::{AdvanceResponse, QuizSessionView},
        },
    },
    repositories::QuestionRepository,
    services::{
        clock::{Clock, SystemClock},
        quiz_session::QuizController,
    },
};

struct SessionEntry {
    controller: QuizController,
    last_touched: DateTime<Utc>,
}

/// Hosts one [`QuizController`] per learner session.
///
/// Sessions untouched for longer than the configured ttl are dropped the
/// next time the session map is locked.
pub struct QuizSessionService {
    repository: Arc<dyn QuestionRepository>,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    clock: Arc<dyn Clock>,
    rng_seed: Option<u64>,
    session_ttl: Duration,
}

impl QuizSessionService {
    pub fn new(
        repository: Arc<dyn QuestionRepository>,
        rng_seed: Option<u64>,
        session_ttl: Duration,
    ) -> Self {
        Self::with_clock(repository, rng_seed, session_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: Arc<dyn QuestionRepository>,
        rng_seed: Option<u64>,
        session_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            sessions: Mutex::new(HashMap::new()),
            clock,
            rng_seed,
            session_ttl,
        }
    }

    fn new_controller(&self) -> QuizController {
        QuizController::with_seed(self.rng_seed, Arc::clone(&self.clock))
    }

    /// Lock the session map, evicting idle sessions first.
    async fn lock_sessions(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        let mut sessions = self.sessions.lock().await;
        let now = self.clock.now();
        let before = sessions.len();

        sessions.retain(|_, entry| {
            (now - entry.last_touched)
                .to_std()
                .map(|idle| idle <= self.session_ttl)
                .unwrap_or(true)
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {} idle quiz sessions", evicted);
        }
        sessions
    }

    pub async fn session_count(&self) -> usize {
        self.lock_sessions().await.len()
    }

    pub async fn list_languages(&self) -> AppResult<Vec<String>> {
        self.repository.list_languages().await
    }

    /// Open a new session. A failure to list languages does not prevent it;
    /// the session simply carries the notice.
    pub async fn create_session(&self) -> AppResult<QuizSessionView> {
        let mut controller = self.new_controller();
        let _ = controller.load_languages(self.repository.as_ref()).await;

        let id = Uuid::new_v4();
        let view = QuizSessionView::from_controller(id, &controller);
        let entry = SessionEntry {
            controller,
            last_touched: self.clock.now(),
        };
        self.lock_sessions().await.insert(id, entry);

        log::info!("Created quiz session {}", id);
        Ok(view)
    }

    async fn with_session<T>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut QuizController) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut sessions = self.lock_sessions().await;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz session '{}' not found", id)))?;
        entry.last_touched = self.clock.now();
        f(&mut entry.controller)
    }

    pub async fn get_session(&self, id: &Uuid) -> AppResult<QuizSessionView> {
        self.with_session(id, |c| Ok(QuizSessionView::from_controller(*id, c)))
            .await
    }

    pub async fn configure(&self, id: &Uuid, request: ConfigureQuizRequest) -> AppResult<QuizSessionView> {
        let count = request.question_count()?;
        self.with_session(id, |c| {
            c.configure(&request.language, count)?;
            Ok(QuizSessionView::from_controller(*id, c))
        })
        .await
    }

    /// Submit the staged configuration and start the quiz.
    ///
    /// The session lock is released while the questions are fetched; a
    /// restart or resubmission in the meantime turns this fetch stale.
    pub async fn start(&self, id: &Uuid) -> AppResult<QuizSessionView> {
        let ticket = self.with_session(id, |c| c.begin_loading()).await?;

        let result = self
            .repository
            .list_questions_by_language(ticket.language())
            .await;

        self.with_session(id, |c| {
            c.complete_loading(ticket, result)?;
            Ok(QuizSessionView::from_controller(*id, c))
        })
        .await
    }

    pub async fn select_answer(&self, id: &Uuid, choice_index: usize) -> AppResult<QuizSessionView> {
        self.with_session(id, |c| {
            c.select_answer(choice_index)?;
            Ok(QuizSessionView::from_controller(*id, c))
        })
        .await
    }

    pub async fn advance(&self, id: &Uuid) -> AppResult<AdvanceResponse> {
        self.with_session(id, |c| {
            let outcome = c.advance()?;
            Ok(AdvanceResponse {
                outcome,
                session: QuizSessionView::from_controller(*id, c),
            })
        })
        .await
    }

    pub async fn restart(&self, id: &Uuid) -> AppResult<QuizSessionView> {
        self.with_session(id, |c| {
            c.restart();
            Ok(QuizSessionView::from_controller(*id, c))
        })
        .await
    }

    pub async fn result(&self, id: &Uuid) -> AppResult<QuizReview> {
        self.with_session(id, |c| c.review()).await
    }

    pub async fn delete_session(&self, id: &Uuid) -> AppResult<()> {
        match self.lock_sessions().await.remove(id) {
            Some(_) => {
                log::info!("Deleted quiz session {}", id);
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Quiz session '{}' not found", id))),
        }
    }
}
