use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::ResultSummary,
    repositories::{QuizAttemptRepository, QuizRepository},
    services::scoring,
};

pub struct ResultsService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
}

impl ResultsService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
        }
    }

    /// Recomputed from the stored attempts on every call.
    pub async fn get_results(&self, quiz_id: &str) -> AppResult<ResultSummary> {
        if self.quiz_repository.find_by_id(quiz_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz_id
            )));
        }

        let attempts = self.attempt_repository.list_by_quiz(quiz_id).await?;
        Ok(scoring::summarize(quiz_id, &attempts))
    }
}
