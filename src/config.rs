use std::env;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: SecretString,
    pub mongo_db_name: String,
    pub mongo_max_pool_size: u32,
    pub mongo_min_pool_size: u32,
    pub mongo_connect_timeout_seconds: u64,
    pub quizzes_collection: String,
    pub attempts_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub submission_grace_seconds: i64,
    pub expiry_sweep_interval_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: SecretString::from(
                env::var("MONGO_CONN_STRING")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quiz-sessions-local".to_string()),
            mongo_max_pool_size: env::var("MONGO_MAX_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            mongo_min_pool_size: env::var("MONGO_MIN_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            mongo_connect_timeout_seconds: env::var("MONGO_CONNECT_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            quizzes_collection: env::var("QUIZZES_COLLECTION")
                .unwrap_or_else(|_| "quizzes".to_string()),
            attempts_collection: env::var("ATTEMPTS_COLLECTION")
                .unwrap_or_else(|_| "quiz_attempts".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            submission_grace_seconds: env::var("SUBMISSION_GRACE_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            expiry_sweep_interval_seconds: env::var("EXPIRY_SWEEP_INTERVAL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Reject settings the session engine cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.submission_grace_seconds < 0 {
            return Err(AppError::ValidationError(format!(
                "SUBMISSION_GRACE_SECONDS must not be negative (got {})",
                self.submission_grace_seconds
            )));
        }

        if self.mongo_max_pool_size == 0 || self.mongo_min_pool_size > self.mongo_max_pool_size {
            return Err(AppError::ValidationError(format!(
                "MongoDB pool bounds are invalid (min {}, max {})",
                self.mongo_min_pool_size, self.mongo_max_pool_size
            )));
        }

        if self.mongo_connect_timeout_seconds == 0 {
            return Err(AppError::ValidationError(
                "MONGO_CONNECT_TIMEOUT_SECONDS must be at least 1".to_string(),
            ));
        }

        if self.expiry_sweep_interval_seconds == 0 {
            return Err(AppError::ValidationError(
                "EXPIRY_SWEEP_INTERVAL_SECONDS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn submission_grace(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.submission_grace_seconds)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: SecretString::from("mongodb://localhost:27017".to_string()),
            mongo_db_name: "quiz-sessions-test".to_string(),
            mongo_max_pool_size: 10,
            mongo_min_pool_size: 2,
            mongo_connect_timeout_seconds: 5,
            quizzes_collection: "quizzes".to_string(),
            attempts_collection: "quiz_attempts".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            submission_grace_seconds: 30,
            expiry_sweep_interval_seconds: 5,
        }
    }
}
