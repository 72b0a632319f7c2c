#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::models::domain::quiz::QuizDraftParams;
    use crate::models::domain::{
        PublishState, Quiz, QuizQuestion, QuizQuestionOption, ReleasePolicy,
    };

    /// The release instant `T` every fixture quiz is scheduled at.
    pub fn start_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    pub fn minutes_after(instant: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
        instant + Duration::minutes(minutes)
    }

    /// Three options per question, the second one correct.
    pub fn question(index: usize) -> QuizQuestion {
        QuizQuestion::new(
            &format!("Question {}", index + 1),
            vec![
                QuizQuestionOption::new("Option A", false),
                QuizQuestionOption::new("Option B", true),
                QuizQuestionOption::new("Option C", false),
            ],
        )
    }

    /// Draft releasing at `T`, deadline `T+60m`, 30 minute attempts, 50% to pass.
    pub fn draft_quiz(question_count: usize) -> Quiz {
        let mut quiz = Quiz::new_draft(
            QuizDraftParams {
                title: "Weekly check",
                class_id: "class-7b",
                subject: "Science",
                created_by_teacher_id: "teacher-1",
                duration_minutes: 30,
                passing_score_percent: 50,
                release_policy: ReleasePolicy::ScheduledAt(start_instant()),
                deadline: Some(minutes_after(start_instant(), 60)),
            },
            minutes_after(start_instant(), -120),
        );
        quiz.questions = (0..question_count).map(question).collect();
        quiz
    }

    pub fn live_quiz(question_count: usize) -> Quiz {
        let mut quiz = draft_quiz(question_count);
        quiz.publish_state = PublishState::Published;
        quiz.published_at = Some(minutes_after(start_instant(), -60));
        quiz
    }

    pub fn correct_option_id(quiz: &Quiz, index: usize) -> String {
        quiz.questions[index].options[1].id.clone()
    }

    pub fn wrong_option_id(quiz: &Quiz, index: usize) -> String {
        quiz.questions[index].options[0].id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::PublishState;

    #[test]
    fn test_fixtures_live_quiz() {
        let quiz = live_quiz(4);

        assert_eq!(quiz.questions.len(), 4);
        assert_eq!(quiz.publish_state, PublishState::Published);
        assert_eq!(
            quiz.questions[2].correct_option_id(),
            Some(correct_option_id(&quiz, 2).as_str())
        );
    }

    #[test]
    fn test_fixtures_draft_quiz() {
        let quiz = draft_quiz(0);

        assert!(quiz.is_draft());
        assert_eq!(quiz.deadline, Some(minutes_after(start_instant(), 60)));
    }
}
