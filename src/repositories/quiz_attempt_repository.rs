use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::quiz_attempt::{AttemptClosure, LockedAnswer, QuizAttempt},
};

/// Attempt store. The two compare-and-set writes return `None` when the attempt
/// was no longer InProgress at `expected_cursor`; nothing is written in that case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    /// Atomic create; a second attempt for the same (student, quiz) fails with
    /// `AppError::DuplicateAttempt`.
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
    async fn find_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<QuizAttempt>>;
    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn list_in_progress(&self) -> AppResult<Vec<QuizAttempt>>;
    async fn append_answer(
        &self,
        attempt_id: &str,
        expected_cursor: u32,
        answer: LockedAnswer,
    ) -> AppResult<Option<QuizAttempt>>;
    async fn compare_and_submit(
        &self,
        attempt_id: &str,
        expected_cursor: u32,
        closure: AttemptClosure,
    ) -> AppResult<Option<QuizAttempt>>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // One attempt per student per quiz, enforced by the store itself
        let student_quiz_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_quiz_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_state_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "state": 1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_state".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(student_quiz_index).await?;
        self.collection.create_index(quiz_state_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn find_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        let attempt = self
            .collection
            .find_one(doc! {
                "student_id": student_id,
                "quiz_id": quiz_id
            })
            .await?;
        Ok(attempt)
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "student_id": student_id })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn list_in_progress(&self) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "state": "InProgress" })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn append_answer(
        &self,
        attempt_id: &str,
        expected_cursor: u32,
        answer: LockedAnswer,
    ) -> AppResult<Option<QuizAttempt>> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! {
                    "id": attempt_id,
                    "state": "InProgress",
                    "cursor": i64::from(expected_cursor),
                },
                doc! {
                    "$push": { "locked_answers": to_bson(&answer)? },
                    "$inc": { "cursor": 1 },
                },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn compare_and_submit(
        &self,
        attempt_id: &str,
        expected_cursor: u32,
        closure: AttemptClosure,
    ) -> AppResult<Option<QuizAttempt>> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! {
                    "id": attempt_id,
                    "state": "InProgress",
                    "cursor": i64::from(expected_cursor),
                },
                doc! {
                    "$set": {
                        "state": to_bson(&closure.state)?,
                        "submitted_at": to_bson(&closure.submitted_at)?,
                        "termination_reason": to_bson(&closure.termination_reason)?,
                        "score": to_bson(&closure.score)?,
                        "late": closure.late,
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }
}
