//! Quiz visibility rules. Pure functions of the quiz and the caller-supplied `now`.

use chrono::{DateTime, Utc};

use crate::models::domain::{EffectiveStatus, PublishState, Quiz, QuizStatus};

pub fn quiz_status(quiz: &Quiz, now: DateTime<Utc>) -> QuizStatus {
    if quiz.publish_state == PublishState::Draft {
        return QuizStatus::Draft;
    }

    let release_at = quiz.release_at(now);

    // A window with release_at >= deadline is empty and reports Expired at every instant.
    if let Some(deadline) = quiz.deadline {
        if now >= deadline || release_at >= deadline {
            return QuizStatus::Expired;
        }
    }

    if release_at > now {
        QuizStatus::Scheduled
    } else {
        QuizStatus::Live
    }
}

/// Applies the per-student overlay: a finished attempt shows as Completed.
pub fn effective_status(
    quiz: &Quiz,
    now: DateTime<Utc>,
    has_terminal_attempt: bool,
) -> EffectiveStatus {
    if has_terminal_attempt {
        return EffectiveStatus::Completed;
    }
    quiz_status(quiz, now).into()
}
