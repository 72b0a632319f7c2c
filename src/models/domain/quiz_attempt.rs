use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub student_id: String,
    pub quiz_id: String,
    pub state: AttemptState,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub termination_reason: Option<TerminationReason>,
    // Append-only; entry i answers question i
    pub locked_answers: Vec<LockedAnswer>,
    pub cursor: u32,
    pub score: Option<AttemptScore>,
    #[serde(default)]
    pub late: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
pub enum AttemptState {
    InProgress,
    Submitted,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
pub enum TerminationReason {
    Manual,
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct LockedAnswer {
    pub question_id: String,
    pub option_id: String,
    pub answered_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct AttemptScore {
    pub correct: u32,
    pub total: u32,
    pub percent: f64,
    pub passed: bool,
}

/// Everything written by the single InProgress -> terminal transition.
#[derive(Clone, Debug, PartialEq)]
pub struct AttemptClosure {
    pub state: AttemptState,
    pub submitted_at: DateTime<Utc>,
    pub termination_reason: TerminationReason,
    pub score: AttemptScore,
    pub late: bool,
}

impl QuizAttempt {
    pub fn start(student_id: &str, quiz_id: &str, now: DateTime<Utc>) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            quiz_id: quiz_id.to_string(),
            state: AttemptState::InProgress,
            started_at: now,
            submitted_at: None,
            termination_reason: None,
            locked_answers: Vec::new(),
            cursor: 0,
            score: None,
            late: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state != AttemptState::InProgress
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor as usize
    }

    /// Local mirror of what a successful `append_answer` writes.
    pub fn lock_answer(&mut self, answer: LockedAnswer) {
        self.locked_answers.push(answer);
        self.cursor += 1;
    }

    /// Local mirror of what a successful `compare_and_submit` writes.
    pub fn close(&mut self, closure: AttemptClosure) {
        self.state = closure.state;
        self.submitted_at = Some(closure.submitted_at);
        self.termination_reason = Some(closure.termination_reason);
        self.score = Some(closure.score);
        self.late = closure.late;
    }
}
