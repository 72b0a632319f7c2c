pub mod mutations;
pub mod queries;

use async_graphql::{EmptySubscription, Schema as GraphQLSchema};

use crate::app_state::AppState;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::repositories::{MockQuizAttemptRepository, MockQuizRepository};

    fn schema_with(quizzes: MockQuizRepository, attempts: MockQuizAttemptRepository) -> Schema {
        create_schema(AppState::with_repositories(
            Config::test_config(),
            Arc::new(quizzes),
            Arc::new(attempts),
        ))
    }

    #[test]
    fn test_sdl_exposes_session_operations() {
        let sdl = schema_with(MockQuizRepository::new(), MockQuizAttemptRepository::new()).sdl();

        for field in [
            "availableQuizzes",
            "startSession",
            "submitAnswer",
            "submitSession",
            "SubmissionOutcome",
            "results",
        ] {
            assert!(sdl.contains(field), "missing {}", field);
        }
    }

    #[tokio::test]
    async fn test_missing_quiz_reports_not_found_code() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));

        let schema = schema_with(quizzes, MockQuizAttemptRepository::new());
        let response = schema
            .execute(r#"{ results(quizId: "missing") { attemptCount } }"#)
            .await;

        assert_eq!(response.errors.len(), 1);
        let code = response.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::String("NOT_FOUND".to_string())));
    }
}
