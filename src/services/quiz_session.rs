use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Notice, Question, QuestionCount, QuizConfiguration, QuizReview, ScoreSummary},
    repositories::QuestionRepository,
    services::{
        clock::Clock,
        grading_service::GradingService,
        sampling::sample_questions,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    Configuring,
    Loading,
    InProgress,
    Finished,
}

/// Identifies one question fetch. Only the ticket of the latest submission
/// can complete a load; older ones are discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    language: String,
    requested: QuestionCount,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn requested(&self) -> QuestionCount {
        self.requested
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StartOutcome {
    Started { served: usize, requested: usize },
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    Advanced { index: usize },
    Finished,
    AnswerRequired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
    pub answered: usize,
}

struct QuizSession {
    language: String,
    requested: QuestionCount,
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<String, usize>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    fn elapsed_seconds(&self) -> u64 {
        self.ended_at
            .map(|ended| (ended - self.started_at).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }
}

/// Keeps the first question for every id; answers are keyed by id.
fn unique_by_id(pool: Vec<Question>) -> Vec<Question> {
    let mut seen = HashSet::new();
    let before = pool.len();
    let unique: Vec<Question> = pool
        .into_iter()
        .filter(|q| seen.insert(q.id.clone()))
        .collect();
    if unique.len() < before {
        log::warn!("Dropped {} questions with repeated ids", before - unique.len());
    }
    unique
}

enum Phase {
    Configuring,
    Loading(FetchTicket),
    InProgress(QuizSession),
    Finished(QuizSession),
}

/// Drives a single quiz attempt from configuration to review.
///
/// Every transition is an explicit method call. The only asynchronous step is
/// the question fetch, which [`QuizController::begin_loading`] and
/// [`QuizController::complete_loading`] split in two so the caller can run the
/// request without holding the controller.
pub struct QuizController {
    configuration: QuizConfiguration,
    languages: Vec<String>,
    phase: Phase,
    generation: u64,
    notice: Option<Notice>,
    rng: Box<dyn RngCore + Send + Sync>,
    clock: Arc<dyn Clock>,
}

impl QuizController {
    pub fn new(rng: Box<dyn RngCore + Send + Sync>, clock: Arc<dyn Clock>) -> Self {
        Self {
            configuration: QuizConfiguration::default(),
            languages: Vec::new(),
            phase: Phase::Configuring,
            generation: 0,
            notice: None,
            rng,
            clock,
        }
    }

    /// A controller sampling from `StdRng`, seeded when `seed` is given and
    /// from OS entropy otherwise.
    pub fn with_seed(seed: Option<u64>, clock: Arc<dyn Clock>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(Box::new(rng), clock)
    }

    pub fn state(&self) -> QuizState {
        match self.phase {
            Phase::Configuring => QuizState::Configuring,
            Phase::Loading(_) => QuizState::Loading,
            Phase::InProgress(_) => QuizState::InProgress,
            Phase::Finished(_) => QuizState::Finished,
        }
    }

    pub fn configuration(&self) -> &QuizConfiguration {
        &self.configuration
    }

    /// The configuration the current fetch or session runs with. It can
    /// differ from [`QuizController::configuration`] when the learner stages
    /// new choices while questions are loading.
    pub fn active_configuration(&self) -> Option<QuizConfiguration> {
        match &self.phase {
            Phase::Configuring => None,
            Phase::Loading(ticket) => Some(QuizConfiguration::new(
                ticket.language(),
                Some(ticket.requested()),
            )),
            Phase::InProgress(session) | Phase::Finished(session) => Some(
                QuizConfiguration::new(&session.language, Some(session.requested)),
            ),
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_languages(&mut self, languages: Vec<String>) {
        self.languages = languages;
    }

    /// Fetch the selectable languages. A failure leaves the list untouched
    /// and is reported through a notice as well as the returned error.
    pub async fn load_languages(&mut self, repository: &dyn QuestionRepository) -> AppResult<&[String]> {
        match repository.list_languages().await {
            Ok(languages) => {
                log::debug!("Loaded {} quiz languages", languages.len());
                self.languages = languages;
                Ok(&self.languages)
            }
            Err(e) => {
                log::warn!("Failed to load quiz languages: {}", e);
                self.notice = Some(Notice::LanguagesUnavailable {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Stage the learner's choices. The configuration is stored even when it
    /// is incomplete; the returned error says what is still missing.
    pub fn configure(&mut self, language: &str, requested_count: Option<QuestionCount>) -> AppResult<()> {
        if matches!(self.phase, Phase::InProgress(_) | Phase::Finished(_)) {
            return Err(AppError::InvalidState(
                "Restart the quiz before changing its configuration".to_string(),
            ));
        }

        self.configuration = QuizConfiguration::new(language, requested_count);
        self.validated_configuration().map(|_| ())
    }

    fn validated_configuration(&self) -> AppResult<(String, QuestionCount)> {
        self.configuration.validate()?;

        let language = self.configuration.language.clone();
        if !self.languages.is_empty() && !self.languages.contains(&language) {
            return Err(AppError::ValidationError(format!(
                "'{}' is not an available quiz language",
                language
            )));
        }

        let requested = self.configuration.requested_count.ok_or_else(|| {
            AppError::ValidationError("Please select the number of questions".to_string())
        })?;

        Ok((language, requested))
    }

    /// Submit the staged configuration and enter `Loading`.
    ///
    /// Submitting again while a fetch is in flight supersedes it.
    pub fn begin_loading(&mut self) -> AppResult<FetchTicket> {
        if matches!(self.phase, Phase::InProgress(_) | Phase::Finished(_)) {
            return Err(AppError::InvalidState(
                "A quiz is already running; restart it first".to_string(),
            ));
        }

        let (language, requested) = match self.validated_configuration() {
            Ok(valid) => valid,
            Err(e) => {
                let message = match &e {
                    AppError::ValidationError(message) => message.clone(),
                    other => other.to_string(),
                };
                self.notice = Some(Notice::ValidationFailed { message });
                return Err(e);
            }
        };

        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            language,
            requested,
        };
        log::info!(
            "Loading {} questions for {} (generation {})",
            ticket.requested,
            ticket.language,
            ticket.generation
        );

        self.notice = None;
        self.phase = Phase::Loading(ticket.clone());
        Ok(ticket)
    }

    /// Apply the result of the fetch identified by `ticket`.
    pub fn complete_loading(
        &mut self,
        ticket: FetchTicket,
        result: AppResult<Vec<Question>>,
    ) -> AppResult<StartOutcome> {
        match &self.phase {
            Phase::Loading(current) if current.generation == ticket.generation => {}
            _ => {
                log::debug!(
                    "Discarding stale question fetch (generation {})",
                    ticket.generation
                );
                return Ok(StartOutcome::Stale);
            }
        }

        let pool = match result {
            Ok(pool) => pool,
            Err(e) => {
                log::warn!("Question fetch for {} failed: {}", ticket.language, e);
                self.phase = Phase::Configuring;
                self.notice = Some(Notice::FetchFailed {
                    message: e.to_string(),
                });
                return Err(match e {
                    AppError::RepositoryError(_) => e,
                    other => AppError::RepositoryError(other.to_string()),
                });
            }
        };

        if pool.is_empty() {
            log::info!("No questions available for {}", ticket.language);
            self.phase = Phase::Configuring;
            self.notice = Some(Notice::NoQuestionsAvailable {
                language: ticket.language.clone(),
            });
            return Err(AppError::NoQuestionsAvailable(ticket.language));
        }

        let requested = ticket.requested.get();
        let questions = sample_questions(unique_by_id(pool), requested, &mut *self.rng);
        let served = questions.len();

        if served < requested {
            self.notice = Some(Notice::InsufficientQuestions {
                language: ticket.language.clone(),
                available: served,
                requested,
            });
        }

        log::info!(
            "Quiz started: {} of {} requested {} questions",
            served,
            requested,
            ticket.language
        );
        self.phase = Phase::InProgress(QuizSession {
            language: ticket.language,
            requested: ticket.requested,
            questions,
            current_index: 0,
            answers: HashMap::new(),
            started_at: self.clock.now(),
            ended_at: None,
        });

        Ok(StartOutcome::Started { served, requested })
    }

    /// Submit the configuration, fetch its questions and start the session.
    pub async fn start_session(&mut self, repository: &dyn QuestionRepository) -> AppResult<StartOutcome> {
        let ticket = self.begin_loading()?;
        let result = repository
            .list_questions_by_language(ticket.language())
            .await;
        self.complete_loading(ticket, result)
    }

    /// Record (or overwrite) the answer to the current question.
    pub fn select_answer(&mut self, choice_index: usize) -> AppResult<()> {
        let Phase::InProgress(session) = &mut self.phase else {
            return Err(AppError::InvalidState(
                "Answers can only be selected while a quiz is in progress".to_string(),
            ));
        };

        let question = session
            .current_question()
            .ok_or_else(|| AppError::InternalError("No current question".to_string()))?;

        if choice_index >= question.choices.len() {
            return Err(AppError::ValidationError(format!(
                "Choice {} does not exist; the question has {} choices",
                choice_index,
                question.choices.len()
            )));
        }

        let question_id = question.id.clone();
        log::debug!("Question {} answered with choice {}", question_id, choice_index);
        session.answers.insert(question_id, choice_index);
        Ok(())
    }

    /// Move past the current question once it has been answered.
    pub fn advance(&mut self) -> AppResult<AdvanceOutcome> {
        let now = self.clock.now();
        let Phase::InProgress(session) = &mut self.phase else {
            return Err(AppError::InvalidState(
                "There is no quiz in progress to advance".to_string(),
            ));
        };

        let answered = session
            .current_question()
            .map(|q| session.answers.contains_key(&q.id))
            .unwrap_or(false);
        if !answered {
            return Ok(AdvanceOutcome::AnswerRequired);
        }

        session.current_index += 1;
        if session.current_index < session.questions.len() {
            return Ok(AdvanceOutcome::Advanced {
                index: session.current_index,
            });
        }

        session.ended_at = Some(now);
        if let Phase::InProgress(session) = std::mem::replace(&mut self.phase, Phase::Configuring) {
            log::info!(
                "Quiz finished after {} questions in {}s",
                session.questions.len(),
                session.elapsed_seconds()
            );
            self.phase = Phase::Finished(session);
        }
        Ok(AdvanceOutcome::Finished)
    }

    /// Drop the current attempt and any in-flight fetch, clearing the
    /// configuration. The language list is kept.
    pub fn restart(&mut self) {
        self.generation += 1;
        self.phase = Phase::Configuring;
        self.configuration = QuizConfiguration::default();
        self.notice = None;
    }

    fn finished_session(&self) -> AppResult<&QuizSession> {
        match &self.phase {
            Phase::Finished(session) => Ok(session),
            _ => Err(AppError::InvalidState("The quiz is not finished yet".to_string())),
        }
    }

    pub fn score_summary(&self) -> AppResult<ScoreSummary> {
        let session = self.finished_session()?;
        Ok(GradingService::score(&session.questions, &session.answers))
    }

    pub fn elapsed_seconds(&self) -> AppResult<u64> {
        Ok(self.finished_session()?.elapsed_seconds())
    }

    pub fn review(&self) -> AppResult<QuizReview> {
        let session = self.finished_session()?;
        Ok(GradingService::build_review(
            &session.questions,
            &session.answers,
            session.elapsed_seconds(),
        ))
    }

    fn session(&self) -> Option<&QuizSession> {
        match &self.phase {
            Phase::InProgress(session) | Phase::Finished(session) => Some(session),
            _ => None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        self.session().map(|s| s.questions.as_slice()).unwrap_or(&[])
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            Phase::InProgress(session) => session.current_question(),
            _ => None,
        }
    }

    pub fn selected_answer(&self) -> Option<usize> {
        let question = self.current_question()?;
        self.answer_for(&question.id)
    }

    pub fn answer_for(&self, question_id: &str) -> Option<usize> {
        self.session()?.answers.get(question_id).copied()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.session().map(|s| Progress {
            index: s.current_index,
            total: s.questions.len(),
            answered: s.answers.len(),
        })
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.session().map(|s| s.started_at)
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.session().and_then(|s| s.ended_at)
    }
}
