pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

pub use health_handler::health_check;
pub use quiz_handler::{
    advance_session, configure_session, create_session, delete_session, get_session,
    list_languages, restart_session, select_answer, session_result, start_session,
};

/// Registers every route of the service.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(list_languages)
        .service(create_session)
        .service(get_session)
        .service(configure_session)
        .service(start_session)
        .service(select_answer)
        .service(advance_session)
        .service(restart_session)
        .service(session_result)
        .service(delete_session);
}
