use async_graphql::InputObject;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::quiz::ReleasePolicy;
use crate::models::domain::TerminationReason;

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct CreateQuizDraftRequest {
    #[validate(length(min = 1, max = 100))]
    pub teacher_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 100))]
    pub class_id: String,

    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: u32,

    #[validate(range(max = 100))]
    pub passing_score_percent: u32,

    // Absent means released as soon as it is published
    pub release_at: Option<DateTime<Utc>>,

    pub deadline: Option<DateTime<Utc>>,
}

impl CreateQuizDraftRequest {
    pub fn release_policy(&self) -> ReleasePolicy {
        match self.release_at {
            Some(at) => ReleasePolicy::ScheduledAt(at),
            None => ReleasePolicy::Immediate,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct OptionInput {
    #[validate(length(min = 1, max = 500))]
    pub text: String,

    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AddQuestionInput {
    #[validate(length(min = 1, max = 100))]
    pub teacher_id: String,

    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    #[validate(nested)]
    pub options: Vec<OptionInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct PublishQuizInput {
    #[validate(length(min = 1, max = 100))]
    pub teacher_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct StartSessionInput {
    #[validate(length(min = 1, max = 100))]
    pub student_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitAnswerInput {
    #[validate(length(min = 1, max = 100))]
    pub student_id: String,

    #[validate(length(min = 1))]
    pub question_id: String,

    #[validate(length(min = 1))]
    pub option_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitSessionInput {
    #[validate(length(min = 1, max = 100))]
    pub student_id: String,

    pub reason: TerminationReason,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudentQuery {
    #[validate(length(min = 1, max = 100))]
    pub student_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableQuizzesQuery {
    pub class_id: Option<String>,
}

/// Optional requester for the student quiz view; an attempt holder may still
/// read the questions once the quiz has left its live window.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizForTakingQuery {
    pub student_id: Option<String>,
}
