use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz::QuizDraftParams, Quiz, QuizAttempt, QuizQuestion, QuizQuestionOption,
            QuizStatus,
        },
        dto::{
            request::{AddQuestionInput, CreateQuizDraftRequest},
            response::{AuthoredQuiz, AvailableQuiz, QuizCard, QuizForTaking},
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{quiz_validation, scheduler},
};

pub struct QuizService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
}

impl QuizService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
        }
    }

    async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quiz_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    async fn get_owned_quiz(&self, id: &str, teacher_id: &str) -> AppResult<Quiz> {
        let quiz = self.get_quiz(id).await?;
        if quiz.created_by_teacher_id != teacher_id {
            return Err(AppError::Forbidden(
                "Only the quiz creator can modify this quiz".to_string(),
            ));
        }
        Ok(quiz)
    }

    pub async fn create_quiz_draft(
        &self,
        request: CreateQuizDraftRequest,
        now: DateTime<Utc>,
    ) -> AppResult<AuthoredQuiz> {
        request.validate()?;

        let quiz = Quiz::new_draft(
            QuizDraftParams {
                title: &request.title,
                class_id: &request.class_id,
                subject: &request.subject,
                created_by_teacher_id: &request.teacher_id,
                duration_minutes: request.duration_minutes,
                passing_score_percent: request.passing_score_percent,
                release_policy: request.release_policy(),
                deadline: request.deadline,
            },
            now,
        );

        let created = self.quiz_repository.create_draft(quiz).await?;
        log::info!(
            "Quiz draft {} created by teacher {}",
            created.id,
            created.created_by_teacher_id
        );

        Ok(created.into())
    }

    pub async fn add_question(
        &self,
        quiz_id: &str,
        input: AddQuestionInput,
        now: DateTime<Utc>,
    ) -> AppResult<AuthoredQuiz> {
        input.validate()?;

        let mut quiz = self.get_owned_quiz(quiz_id, &input.teacher_id).await?;
        if !quiz.is_draft() {
            return Err(AppError::BadRequest(format!(
                "Quiz '{}' is published and can no longer be edited",
                quiz_id
            )));
        }

        let options = input
            .options
            .iter()
            .map(|opt| QuizQuestionOption::new(&opt.text, opt.correct))
            .collect();
        quiz.questions.push(QuizQuestion::new(&input.text, options));
        quiz.modified_at = Some(now);

        let updated = self
            .quiz_repository
            .update_draft(quiz)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Quiz '{}' was published while the question was being added",
                    quiz_id
                ))
            })?;

        Ok(updated.into())
    }

    pub async fn publish_quiz(
        &self,
        quiz_id: &str,
        teacher_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AuthoredQuiz> {
        let quiz = self.get_owned_quiz(quiz_id, teacher_id).await?;
        if !quiz.is_draft() {
            return Err(AppError::BadRequest(format!(
                "Quiz '{}' is already published",
                quiz_id
            )));
        }

        quiz_validation::validate_for_publish(&quiz)?;

        let published = self
            .quiz_repository
            .publish(quiz_id, now)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Quiz '{}' is already published", quiz_id))
            })?;

        log::info!(
            "Quiz {} published by teacher {} with {} questions, status now {:?}",
            quiz_id,
            teacher_id,
            published.total_questions(),
            scheduler::quiz_status(&published, now)
        );

        Ok(published.into())
    }

    /// Student view; correct options are never included and drafts do not exist.
    /// Content is served while the quiz is live, or afterwards to a student who
    /// already holds an attempt for it.
    pub async fn get_quiz_for_taking(
        &self,
        quiz_id: &str,
        student_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<QuizForTaking> {
        let quiz = self.get_quiz(quiz_id).await?;
        if quiz.is_draft() {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz_id
            )));
        }

        let status = scheduler::quiz_status(&quiz, now);
        if status != QuizStatus::Live {
            let has_attempt = match student_id {
                Some(student_id) => self
                    .attempt_repository
                    .find_by_student_and_quiz(student_id, quiz_id)
                    .await?
                    .is_some(),
                None => false,
            };
            if !has_attempt {
                return Err(AppError::NotLive(format!(
                    "Quiz '{}' is {:?} at {}",
                    quiz_id, status, now
                )));
            }
        }

        Ok(QuizForTaking::from_quiz(&quiz))
    }

    pub async fn get_authored_quiz(&self, quiz_id: &str, teacher_id: &str) -> AppResult<AuthoredQuiz> {
        Ok(self.get_owned_quiz(quiz_id, teacher_id).await?.into())
    }

    /// Published quizzes with the student's effective status. Read-only: overdue
    /// attempts are left for the expiry worker or the next session call.
    pub async fn list_available_quizzes(
        &self,
        student_id: &str,
        class_id: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<AvailableQuiz>> {
        let quizzes = self.quiz_repository.list_published(class_id).await?;
        let attempts: HashMap<String, QuizAttempt> = self
            .attempt_repository
            .list_by_student(student_id)
            .await?
            .into_iter()
            .map(|attempt| (attempt.quiz_id.clone(), attempt))
            .collect();

        Ok(quizzes
            .iter()
            .map(|quiz| {
                let attempt = attempts.get(&quiz.id);
                let finished = attempt.is_some_and(QuizAttempt::is_terminal);
                AvailableQuiz {
                    quiz: QuizCard::from(quiz),
                    effective_status: scheduler::effective_status(quiz, now, finished),
                    attempt_id: attempt.map(|a| a.id.clone()),
                }
            })
            .collect())
    }
}
