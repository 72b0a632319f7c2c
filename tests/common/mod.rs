#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::RwLock;

use quiz_session_server::{
    errors::{AppError, AppResult},
    models::domain::{
        quiz::QuizDraftParams,
        quiz_attempt::{AttemptClosure, LockedAnswer},
        AttemptState, PublishState, Quiz, QuizAttempt, QuizQuestion, QuizQuestionOption,
        ReleasePolicy,
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{
        quiz_attempt_service::QuizAttemptService, quiz_service::QuizService,
        results_service::ResultsService,
    },
};

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, Quiz>>,
}

impl InMemoryQuizRepository {
    pub async fn seed(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id.clone(), quiz);
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn create_draft(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::DatabaseError(format!("duplicate quiz id {}", quiz.id)));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn update_draft(&self, quiz: Quiz) -> AppResult<Option<Quiz>> {
        let mut quizzes = self.quizzes.write().await;
        match quizzes.get(&quiz.id) {
            Some(existing) if existing.publish_state == PublishState::Draft => {
                quizzes.insert(quiz.id.clone(), quiz.clone());
                Ok(Some(quiz))
            }
            _ => Ok(None),
        }
    }

    async fn publish(&self, id: &str, published_at: DateTime<Utc>) -> AppResult<Option<Quiz>> {
        let mut quizzes = self.quizzes.write().await;
        match quizzes.get_mut(id) {
            Some(quiz) if quiz.publish_state == PublishState::Draft => {
                quiz.publish_state = PublishState::Published;
                quiz.published_at = Some(published_at);
                quiz.modified_at = Some(published_at);
                Ok(Some(quiz.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_published(&self, class_id: Option<String>) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<Quiz> = quizzes
            .values()
            .filter(|q| q.publish_state == PublishState::Published)
            .filter(|q| class_id.as_ref().map_or(true, |c| &q.class_id == c))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }
}

/// Holds the same guarantees as the Mongo store: unique (student, quiz) and
/// compare-and-set writes under a single lock.
#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: RwLock<HashMap<String, QuizAttempt>>,
}

impl InMemoryQuizAttemptRepository {
    pub async fn len(&self) -> usize {
        self.attempts.read().await.len()
    }

    pub async fn seed(&self, attempt: QuizAttempt) {
        self.attempts
            .write()
            .await
            .insert(attempt.id.clone(), attempt);
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        let exists = attempts
            .values()
            .any(|a| a.student_id == attempt.student_id && a.quiz_id == attempt.quiz_id);
        if exists {
            return Err(AppError::DuplicateAttempt(
                "E11000 duplicate key error".to_string(),
            ));
        }
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        Ok(self.attempts.read().await.get(id).cloned())
    }

    async fn find_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .find(|a| a.student_id == student_id && a.quiz_id == quiz_id)
            .cloned())
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| a.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn list_in_progress(&self) -> AppResult<Vec<QuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| a.state == AttemptState::InProgress)
            .cloned()
            .collect())
    }

    async fn append_answer(
        &self,
        attempt_id: &str,
        expected_cursor: u32,
        answer: LockedAnswer,
    ) -> AppResult<Option<QuizAttempt>> {
        let mut attempts = self.attempts.write().await;
        match attempts.get_mut(attempt_id) {
            Some(attempt)
                if attempt.state == AttemptState::InProgress
                    && attempt.cursor == expected_cursor =>
            {
                attempt.lock_answer(answer);
                Ok(Some(attempt.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn compare_and_submit(
        &self,
        attempt_id: &str,
        expected_cursor: u32,
        closure: AttemptClosure,
    ) -> AppResult<Option<QuizAttempt>> {
        let mut attempts = self.attempts.write().await;
        match attempts.get_mut(attempt_id) {
            Some(attempt)
                if attempt.state == AttemptState::InProgress
                    && attempt.cursor == expected_cursor =>
            {
                attempt.close(closure);
                Ok(Some(attempt.clone()))
            }
            _ => Ok(None),
        }
    }
}

pub struct TestContext {
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub attempts: Arc<InMemoryQuizAttemptRepository>,
    pub quiz_service: QuizService,
    pub attempt_service: Arc<QuizAttemptService>,
    pub results_service: ResultsService,
}

impl TestContext {
    pub fn new() -> Self {
        let quizzes = Arc::new(InMemoryQuizRepository::default());
        let attempts = Arc::new(InMemoryQuizAttemptRepository::default());

        Self {
            quiz_service: QuizService::new(quizzes.clone(), attempts.clone()),
            attempt_service: Arc::new(QuizAttemptService::new(
                quizzes.clone(),
                attempts.clone(),
                grace(),
            )),
            results_service: ResultsService::new(quizzes.clone(), attempts.clone()),
            quizzes,
            attempts,
        }
    }
}

pub fn grace() -> Duration {
    Duration::seconds(30)
}

/// Release instant `T` for every fixture quiz.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(minutes)
}

/// Releases at `T`, deadline `T+60m`, 30 minute attempts, 50% to pass.
/// Option B of every question is correct.
pub fn published_quiz(question_count: usize) -> Quiz {
    let mut quiz = Quiz::new_draft(
        QuizDraftParams {
            title: "Cell biology",
            class_id: "class-9c",
            subject: "Biology",
            created_by_teacher_id: "teacher-1",
            duration_minutes: 30,
            passing_score_percent: 50,
            release_policy: ReleasePolicy::ScheduledAt(t0()),
            deadline: Some(at(60)),
        },
        at(-120),
    );
    quiz.questions = (0..question_count)
        .map(|i| {
            QuizQuestion::new(
                &format!("Question {}", i + 1),
                vec![
                    QuizQuestionOption::new("A", false),
                    QuizQuestionOption::new("B", true),
                    QuizQuestionOption::new("C", false),
                ],
            )
        })
        .collect();
    quiz.publish_state = PublishState::Published;
    quiz.published_at = Some(at(-60));
    quiz
}

pub fn correct(quiz: &Quiz, index: usize) -> String {
    quiz.questions[index].options[1].id.clone()
}

pub fn wrong(quiz: &Quiz, index: usize) -> String {
    quiz.questions[index].options[0].id.clone()
}
