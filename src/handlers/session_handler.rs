use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{StartSessionInput, StudentQuery, SubmitAnswerInput, SubmitSessionInput},
};

#[post("/api/quizzes/{quiz_id}/sessions")]
pub async fn start_session(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<StartSessionInput>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let attempt = state
        .attempt_service
        .start_session(&request.student_id, &quiz_id, Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}

#[get("/api/quizzes/{quiz_id}/sessions/current")]
pub async fn current_session(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    query: web::Query<StudentQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let attempt = state
        .attempt_service
        .current_session(&query.student_id, &quiz_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(attempt))
}

#[get("/api/sessions/{attempt_id}")]
pub async fn get_attempt(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    query: web::Query<StudentQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let attempt = state
        .attempt_service
        .get_attempt(&attempt_id, &query.student_id)
        .await?;
    Ok(HttpResponse::Ok().json(attempt))
}

#[post("/api/sessions/{attempt_id}/answers")]
pub async fn submit_answer(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    request: web::Json<SubmitAnswerInput>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let attempt = state
        .attempt_service
        .submit_answer(
            &attempt_id,
            &request.student_id,
            &request.question_id,
            &request.option_id,
            Utc::now(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(attempt))
}

#[post("/api/sessions/{attempt_id}/submit")]
pub async fn submit_session(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    request: web::Json<SubmitSessionInput>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let outcome = state
        .attempt_service
        .submit_session(&attempt_id, &request.student_id, Utc::now(), request.reason)
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}
