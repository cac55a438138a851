use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{ConfigureQuizRequest, SelectAnswerRequest},
};

#[get("/api/quiz/languages")]
pub async fn list_languages(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let languages = state.quiz_sessions.list_languages().await?;
    Ok(HttpResponse::Ok().json(languages))
}

#[post("/api/quiz/sessions")]
pub async fn create_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let view = state.quiz_sessions.create_session().await?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/api/quiz/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.quiz_sessions.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[put("/api/quiz/sessions/{id}/configuration")]
pub async fn configure_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<ConfigureQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .quiz_sessions
        .configure(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/quiz/sessions/{id}/start")]
pub async fn start_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.quiz_sessions.start(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/quiz/sessions/{id}/answer")]
pub async fn select_answer(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<SelectAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .quiz_sessions
        .select_answer(&id, request.choice_index)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/quiz/sessions/{id}/advance")]
pub async fn advance_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let response = state.quiz_sessions.advance(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/quiz/sessions/{id}/restart")]
pub async fn restart_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.quiz_sessions.restart(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[get("/api/quiz/sessions/{id}/result")]
pub async fn session_result(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let review = state.quiz_sessions.result(&id).await?;
    Ok(HttpResponse::Ok().json(review))
}

#[delete("/api/quiz/sessions/{id}")]
pub async fn delete_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.quiz_sessions.delete_session(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
