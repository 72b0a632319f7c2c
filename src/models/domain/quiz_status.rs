use async_graphql::Enum;
use serde::{Deserialize, Serialize};

/// Schedule-derived status. Never stored, always recomputed from the quiz and `now`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
pub enum QuizStatus {
    Draft,
    Scheduled,
    Live,
    Expired,
}

/// Status as seen by one student: the base status plus their own attempt history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
pub enum EffectiveStatus {
    Draft,
    Scheduled,
    Live,
    Expired,
    Completed,
}

impl From<QuizStatus> for EffectiveStatus {
    fn from(status: QuizStatus) -> Self {
        match status {
            QuizStatus::Draft => EffectiveStatus::Draft,
            QuizStatus::Scheduled => EffectiveStatus::Scheduled,
            QuizStatus::Live => EffectiveStatus::Live,
            QuizStatus::Expired => EffectiveStatus::Expired,
        }
    }
}
