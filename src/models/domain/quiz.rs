use async_graphql::Enum;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz_question::QuizQuestion;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub class_id: String,
    pub subject: String,
    pub created_by_teacher_id: String,
    pub questions: Vec<QuizQuestion>,
    pub duration_minutes: u32,
    pub passing_score_percent: u32,
    pub release_policy: ReleasePolicy,
    // No new attempt may start at or after this instant
    pub deadline: Option<DateTime<Utc>>,
    pub publish_state: PublishState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "at")]
pub enum ReleasePolicy {
    Immediate,
    ScheduledAt(DateTime<Utc>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
pub enum PublishState {
    Draft,
    Published,
}

pub struct QuizDraftParams<'a> {
    pub title: &'a str,
    pub class_id: &'a str,
    pub subject: &'a str,
    pub created_by_teacher_id: &'a str,
    pub duration_minutes: u32,
    pub passing_score_percent: u32,
    pub release_policy: ReleasePolicy,
    pub deadline: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new_draft(params: QuizDraftParams<'_>, now: DateTime<Utc>) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: params.title.to_string(),
            class_id: params.class_id.to_string(),
            subject: params.subject.to_string(),
            created_by_teacher_id: params.created_by_teacher_id.to_string(),
            questions: Vec::new(),
            duration_minutes: params.duration_minutes,
            passing_score_percent: params.passing_score_percent,
            release_policy: params.release_policy,
            deadline: params.deadline,
            publish_state: PublishState::Draft,
            published_at: None,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.publish_state == PublishState::Draft
    }

    /// Instant the quiz becomes visible; an immediate release counts as released at `now`.
    pub fn release_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.release_policy {
            ReleasePolicy::Immediate => now,
            ReleasePolicy::ScheduledAt(at) => at,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    /// End of the answering window for an attempt started at `started_at`:
    /// the per-attempt duration or the quiz deadline, whichever comes first.
    pub fn attempt_closes_at(&self, started_at: DateTime<Utc>) -> DateTime<Utc> {
        let by_duration = started_at + self.duration();
        match self.deadline {
            Some(deadline) if deadline < by_duration => deadline,
            _ => by_duration,
        }
    }

    pub fn question_at(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    pub fn find_question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn total_questions(&self) -> u32 {
        self.questions.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, minute, 0).unwrap()
    }

    fn draft(deadline: Option<DateTime<Utc>>) -> Quiz {
        Quiz::new_draft(
            QuizDraftParams {
                title: "Fractions",
                class_id: "class-7b",
                subject: "Maths",
                created_by_teacher_id: "teacher-1",
                duration_minutes: 30,
                passing_score_percent: 50,
                release_policy: ReleasePolicy::ScheduledAt(at(0)),
                deadline,
            },
            at(0),
        )
    }

    #[test]
    fn new_draft_starts_unpublished_and_empty() {
        let quiz = draft(None);

        assert!(quiz.is_draft());
        assert!(quiz.questions.is_empty());
        assert!(quiz.published_at.is_none());
        assert_eq!(quiz.created_at, Some(at(0)));
    }

    #[test]
    fn release_at_uses_now_for_immediate_policy() {
        let mut quiz = draft(None);
        assert_eq!(quiz.release_at(at(10)), at(0));

        quiz.release_policy = ReleasePolicy::Immediate;
        assert_eq!(quiz.release_at(at(10)), at(10));
    }

    #[test]
    fn attempt_window_is_capped_by_deadline() {
        let quiz = draft(Some(at(50)));

        assert_eq!(quiz.attempt_closes_at(at(5)), at(35));
        assert_eq!(quiz.attempt_closes_at(at(40)), at(50));
    }

    #[test]
    fn release_policy_serializes_with_kind_tag() {
        let json = serde_json::to_value(ReleasePolicy::Immediate).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "Immediate" }));

        let scheduled = ReleasePolicy::ScheduledAt(at(15));
        let round_trip: ReleasePolicy =
            serde_json::from_value(serde_json::to_value(scheduled).unwrap()).unwrap();
        assert_eq!(round_trip, scheduled);
    }
}
