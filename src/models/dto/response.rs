use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::quiz::{PublishState, ReleasePolicy};
use crate::models::domain::quiz_attempt::{AttemptScore, LockedAnswer};
use crate::models::domain::{
    AttemptState, EffectiveStatus, Quiz, QuizAttempt, QuizQuestion, TerminationReason,
};

fn scheduled_release(policy: ReleasePolicy) -> Option<DateTime<Utc>> {
    match policy {
        ReleasePolicy::Immediate => None,
        ReleasePolicy::ScheduledAt(at) => Some(at),
    }
}

/// Quiz metadata shown in listings; carries no question content.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizCard {
    pub id: String,
    pub title: String,
    pub class_id: String,
    pub subject: String,
    pub question_count: u32,
    pub duration_minutes: u32,
    pub passing_score_percent: u32,
    pub release_at: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
}

impl From<&Quiz> for QuizCard {
    fn from(quiz: &Quiz) -> Self {
        QuizCard {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            class_id: quiz.class_id.clone(),
            subject: quiz.subject.clone(),
            question_count: quiz.total_questions(),
            duration_minutes: quiz.duration_minutes,
            passing_score_percent: quiz.passing_score_percent,
            release_at: scheduled_release(quiz.release_policy),
            deadline: quiz.deadline,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AvailableQuiz {
    pub quiz: QuizCard,
    pub effective_status: EffectiveStatus,
    pub attempt_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct OptionForTaking {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionForTaking {
    pub id: String,
    pub text: String,
    pub options: Vec<OptionForTaking>,
}

impl From<&QuizQuestion> for QuestionForTaking {
    fn from(question: &QuizQuestion) -> Self {
        QuestionForTaking {
            id: question.id.clone(),
            text: question.text.clone(),
            options: question
                .options
                .iter()
                .map(|opt| OptionForTaking {
                    id: opt.id.clone(),
                    text: opt.text.clone(),
                })
                .collect(),
        }
    }
}

/// Student view of a quiz: question order preserved, correct answers stripped.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizForTaking {
    pub quiz: QuizCard,
    pub questions: Vec<QuestionForTaking>,
}

impl QuizForTaking {
    pub fn from_quiz(quiz: &Quiz) -> Self {
        QuizForTaking {
            quiz: QuizCard::from(quiz),
            questions: quiz.questions.iter().map(QuestionForTaking::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AuthoredOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AuthoredQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<AuthoredOption>,
}

/// Teacher view of a quiz, including the answer key.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AuthoredQuiz {
    pub quiz: QuizCard,
    pub created_by_teacher_id: String,
    pub publish_state: PublishState,
    pub published_at: Option<DateTime<Utc>>,
    pub questions: Vec<AuthoredQuestion>,
}

impl From<Quiz> for AuthoredQuiz {
    fn from(quiz: Quiz) -> Self {
        AuthoredQuiz {
            quiz: QuizCard::from(&quiz),
            created_by_teacher_id: quiz.created_by_teacher_id,
            publish_state: quiz.publish_state,
            published_at: quiz.published_at,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| AuthoredQuestion {
                    id: q.id,
                    text: q.text,
                    options: q
                        .options
                        .into_iter()
                        .map(|o| AuthoredOption {
                            id: o.id,
                            text: o.text,
                            correct: o.correct,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AttemptView {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub state: AttemptState,
    pub started_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub termination_reason: Option<TerminationReason>,
    pub cursor: u32,
    pub total_questions: u32,
    // None once every question is answered or the attempt is terminal
    pub next_question_id: Option<String>,
    pub locked_answers: Vec<LockedAnswer>,
    pub score: Option<AttemptScore>,
    pub late: bool,
}

impl AttemptView {
    pub fn new(attempt: QuizAttempt, quiz: &Quiz) -> Self {
        let next_question_id = if attempt.is_terminal() {
            None
        } else {
            quiz.question_at(attempt.cursor_index())
                .map(|q| q.id.clone())
        };

        AttemptView {
            closes_at: quiz.attempt_closes_at(attempt.started_at),
            total_questions: quiz.total_questions(),
            next_question_id,
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            student_id: attempt.student_id,
            state: attempt.state,
            started_at: attempt.started_at,
            submitted_at: attempt.submitted_at,
            termination_reason: attempt.termination_reason,
            cursor: attempt.cursor,
            locked_answers: attempt.locked_answers,
            score: attempt.score,
            late: attempt.late,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{live_quiz, minutes_after, start_instant};

    #[test]
    fn quiz_for_taking_hides_correct_flags() {
        let quiz = live_quiz(3);
        let view = QuizForTaking::from_quiz(&quiz);

        let json = serde_json::to_value(&view).unwrap();
        assert!(!json.to_string().contains("correct"));
        assert_eq!(view.questions.len(), 3);
        assert_eq!(view.questions[0].id, quiz.questions[0].id);
    }

    #[test]
    fn attempt_view_points_at_next_question() {
        let quiz = live_quiz(2);
        let attempt = QuizAttempt::start("student-1", &quiz.id, minutes_after(start_instant(), 5));

        let view = AttemptView::new(attempt, &quiz);

        assert_eq!(view.next_question_id.as_deref(), Some(quiz.questions[0].id.as_str()));
        assert_eq!(view.total_questions, 2);
        assert_eq!(view.closes_at, minutes_after(start_instant(), 35));
    }

    #[test]
    fn authored_quiz_keeps_answer_key() {
        let quiz = live_quiz(1);
        let authored = AuthoredQuiz::from(quiz);

        assert_eq!(authored.questions[0].options.iter().filter(|o| o.correct).count(), 1);
    }
}
