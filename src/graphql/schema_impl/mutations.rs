use async_graphql::{Context, Object};
use chrono::Utc;

use crate::{
    app_state::AppState,
    graphql::helpers::{validated, with_code},
    models::{
        domain::SubmissionOutcome,
        dto::{
            request::{
                AddQuestionInput, CreateQuizDraftRequest, PublishQuizInput, StartSessionInput,
                SubmitAnswerInput, SubmitSessionInput,
            },
            response::{AttemptView, AuthoredQuiz},
        },
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_quiz_draft(
        &self,
        ctx: &Context<'_>,
        input: CreateQuizDraftRequest,
    ) -> async_graphql::Result<AuthoredQuiz> {
        let state = ctx.data::<AppState>()?;
        with_code(state.quiz_service.create_quiz_draft(input, Utc::now()).await)
    }

    async fn add_question(
        &self,
        ctx: &Context<'_>,
        quiz_id: String,
        input: AddQuestionInput,
    ) -> async_graphql::Result<AuthoredQuiz> {
        let state = ctx.data::<AppState>()?;
        with_code(
            state
                .quiz_service
                .add_question(&quiz_id, input, Utc::now())
                .await,
        )
    }

    async fn publish_quiz(
        &self,
        ctx: &Context<'_>,
        quiz_id: String,
        input: PublishQuizInput,
    ) -> async_graphql::Result<AuthoredQuiz> {
        let state = ctx.data::<AppState>()?;
        let input = validated(input)?;
        with_code(
            state
                .quiz_service
                .publish_quiz(&quiz_id, &input.teacher_id, Utc::now())
                .await,
        )
    }

    async fn start_session(
        &self,
        ctx: &Context<'_>,
        quiz_id: String,
        input: StartSessionInput,
    ) -> async_graphql::Result<AttemptView> {
        let state = ctx.data::<AppState>()?;
        let input = validated(input)?;
        with_code(
            state
                .attempt_service
                .start_session(&input.student_id, &quiz_id, Utc::now())
                .await,
        )
    }

    async fn submit_answer(
        &self,
        ctx: &Context<'_>,
        attempt_id: String,
        input: SubmitAnswerInput,
    ) -> async_graphql::Result<AttemptView> {
        let state = ctx.data::<AppState>()?;
        let input = validated(input)?;
        with_code(
            state
                .attempt_service
                .submit_answer(
                    &attempt_id,
                    &input.student_id,
                    &input.question_id,
                    &input.option_id,
                    Utc::now(),
                )
                .await,
        )
    }

    /// Idempotent: a second submit returns the result recorded by the first,
    /// together with the quiz's current summary.
    async fn submit_session(
        &self,
        ctx: &Context<'_>,
        attempt_id: String,
        input: SubmitSessionInput,
    ) -> async_graphql::Result<SubmissionOutcome> {
        let state = ctx.data::<AppState>()?;
        let input = validated(input)?;
        with_code(
            state
                .attempt_service
                .submit_session(&attempt_id, &input.student_id, Utc::now(), input.reason)
                .await,
        )
    }
}
