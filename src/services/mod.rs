pub mod clock;
pub mod grading_service;
pub mod quiz_session;
pub mod quiz_session_service;
pub mod sampling;
