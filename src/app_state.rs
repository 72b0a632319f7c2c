use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuizAttemptRepository, MongoQuizRepository, QuizAttemptRepository, QuizRepository,
    },
    services::{
        quiz_attempt_service::QuizAttemptService, quiz_service::QuizService,
        results_service::ResultsService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub attempt_service: Arc<QuizAttemptService>,
    pub results_service: Arc<ResultsService>,
    pub config: Arc<Config>,
    // None when running over non-Mongo repositories
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db, &config.quizzes_collection));
        quiz_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(
            &db,
            &config.attempts_collection,
        ));
        attempt_repository.ensure_indexes().await?;

        log::info!("Repositories ready on database '{}'", db.name());

        let mut state = Self::with_repositories(config, quiz_repository, attempt_repository);
        state.db = Some(db);
        Ok(state)
    }

    pub fn with_repositories(
        config: Config,
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        let quiz_service = Arc::new(QuizService::new(
            quiz_repository.clone(),
            attempt_repository.clone(),
        ));
        let attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository.clone(),
            attempt_repository.clone(),
            config.submission_grace(),
        ));
        let results_service = Arc::new(ResultsService::new(quiz_repository, attempt_repository));

        Self {
            quiz_service,
            attempt_service,
            results_service,
            config: Arc::new(config),
            db: None,
        }
    }
}
