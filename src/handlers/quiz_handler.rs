use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        AddQuestionInput, AvailableQuizzesQuery, CreateQuizDraftRequest, PublishQuizInput,
        QuizForTakingQuery,
    },
};

#[get("/api/students/{student_id}/quizzes")]
pub async fn list_available_quizzes(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
    query: web::Query<AvailableQuizzesQuery>,
) -> Result<HttpResponse, AppError> {
    let quizzes = state
        .quiz_service
        .list_available_quizzes(&student_id, query.into_inner().class_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/api/quizzes/{quiz_id}")]
pub async fn get_quiz_for_taking(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    query: web::Query<QuizForTakingQuery>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .get_quiz_for_taking(&quiz_id, query.student_id.as_deref(), Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/api/quizzes")]
pub async fn create_quiz_draft(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizDraftRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .create_quiz_draft(request.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[post("/api/quizzes/{quiz_id}/questions")]
pub async fn add_question(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<AddQuestionInput>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .add_question(&quiz_id, request.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[post("/api/quizzes/{quiz_id}/publish")]
pub async fn publish_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<PublishQuizInput>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let quiz = state
        .quiz_service
        .publish_quiz(&quiz_id, &request.teacher_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[get("/api/quizzes/{quiz_id}/results")]
pub async fn get_results(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let summary = state.results_service.get_results(&quiz_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}
