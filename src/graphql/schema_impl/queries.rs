use async_graphql::{Context, Object};
use chrono::Utc;

use crate::{
    app_state::AppState,
    graphql::helpers::with_code,
    models::{
        domain::ResultSummary,
        dto::response::{AttemptView, AuthoredQuiz, AvailableQuiz, QuizForTaking},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Published quizzes with the student's effective status.
    async fn available_quizzes(
        &self,
        ctx: &Context<'_>,
        student_id: String,
        class_id: Option<String>,
    ) -> async_graphql::Result<Vec<AvailableQuiz>> {
        let state = ctx.data::<AppState>()?;
        with_code(
            state
                .quiz_service
                .list_available_quizzes(&student_id, class_id, Utc::now())
                .await,
        )
    }

    /// Questions without the answer key; only while live, or for a student
    /// who already has an attempt.
    async fn quiz_for_taking(
        &self,
        ctx: &Context<'_>,
        quiz_id: String,
        student_id: Option<String>,
    ) -> async_graphql::Result<QuizForTaking> {
        let state = ctx.data::<AppState>()?;
        with_code(
            state
                .quiz_service
                .get_quiz_for_taking(&quiz_id, student_id.as_deref(), Utc::now())
                .await,
        )
    }

    async fn authored_quiz(
        &self,
        ctx: &Context<'_>,
        quiz_id: String,
        teacher_id: String,
    ) -> async_graphql::Result<AuthoredQuiz> {
        let state = ctx.data::<AppState>()?;
        with_code(
            state
                .quiz_service
                .get_authored_quiz(&quiz_id, &teacher_id)
                .await,
        )
    }

    async fn current_session(
        &self,
        ctx: &Context<'_>,
        quiz_id: String,
        student_id: String,
    ) -> async_graphql::Result<AttemptView> {
        let state = ctx.data::<AppState>()?;
        with_code(
            state
                .attempt_service
                .current_session(&student_id, &quiz_id, Utc::now())
                .await,
        )
    }

    async fn attempt(
        &self,
        ctx: &Context<'_>,
        attempt_id: String,
        student_id: String,
    ) -> async_graphql::Result<AttemptView> {
        let state = ctx.data::<AppState>()?;
        with_code(
            state
                .attempt_service
                .get_attempt(&attempt_id, &student_id)
                .await,
        )
    }

    async fn results(
        &self,
        ctx: &Context<'_>,
        quiz_id: String,
    ) -> async_graphql::Result<ResultSummary> {
        let state = ctx.data::<AppState>()?;
        with_code(state.results_service.get_results(&quiz_id).await)
    }
}
