use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_attempt::{QuizAttempt, TerminationReason};

/// One terminal attempt's outcome.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct AttemptResult {
    pub attempt_id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub correct: u32,
    pub total: u32,
    pub percent: f64,
    pub passed: bool,
    pub termination_reason: TerminationReason,
    pub submitted_at: DateTime<Utc>,
    pub late: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct RankedResult {
    pub rank: u32,
    #[graphql(flatten)]
    #[serde(flatten)]
    pub result: AttemptResult,
}

/// Teacher view over every terminal attempt of a quiz.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct ResultSummary {
    pub quiz_id: String,
    pub attempt_count: u32,
    pub pass_count: u32,
    pub class_average: Option<f64>,
    pub results: Vec<RankedResult>,
}

/// What `submitSession` hands back: the attempt's recorded result and the
/// quiz's summary read after that result was stored.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct SubmissionOutcome {
    pub result: AttemptResult,
    pub summary: ResultSummary,
}

impl AttemptResult {
    /// `None` while the attempt is still in progress.
    pub fn from_attempt(attempt: &QuizAttempt) -> Option<Self> {
        let score = attempt.score.as_ref()?;
        let submitted_at = attempt.submitted_at?;
        let termination_reason = attempt.termination_reason?;

        Some(AttemptResult {
            attempt_id: attempt.id.clone(),
            quiz_id: attempt.quiz_id.clone(),
            student_id: attempt.student_id.clone(),
            correct: score.correct,
            total: score.total,
            percent: score.percent,
            passed: score.passed,
            termination_reason,
            submitted_at,
            late: attempt.late,
        })
    }
}
