use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time::sleep;

use crate::{errors::AppResult, services::quiz_attempt_service::QuizAttemptService};

/// Periodically closes abandoned attempts whose window has passed.
pub struct ExpiryWorker {
    attempt_service: Arc<QuizAttemptService>,
    interval: Duration,
}

impl ExpiryWorker {
    pub fn new(attempt_service: Arc<QuizAttemptService>, interval: Duration) -> Self {
        Self {
            attempt_service,
            interval,
        }
    }

    pub async fn run(&self) {
        log::info!(
            "Starting expiry worker loop (interval {}s)",
            self.interval.as_secs()
        );

        loop {
            match self.run_once().await {
                Ok(0) => log::debug!("Expiry sweep found nothing to close"),
                Ok(closed) => log::info!("Expiry sweep closed {} attempts", closed),
                Err(err) => log::error!("Expiry sweep failed: {}", err),
            }

            sleep(self.interval).await;
        }
    }

    pub async fn run_once(&self) -> AppResult<usize> {
        self.attempt_service.expire_overdue(Utc::now()).await
    }
}
