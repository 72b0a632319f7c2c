use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz_attempt::{AttemptClosure, LockedAnswer},
            AttemptResult, AttemptState, Quiz, QuizAttempt, QuizStatus, SubmissionOutcome,
            TerminationReason,
        },
        dto::response::AttemptView,
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{scheduler, scoring},
};

// A compare-and-set only fails when another writer moved the attempt; each retry
// observes that write, so a handful of rounds is always enough.
const MAX_SETTLE_ROUNDS: usize = 8;

/// Per-student attempt state machine: InProgress -> Submitted | Expired.
pub struct QuizAttemptService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
    grace: Duration,
}

impl QuizAttemptService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
        grace: Duration,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
            grace,
        }
    }

    async fn load_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    async fn load_attempt(&self, attempt_id: &str) -> AppResult<QuizAttempt> {
        self.attempt_repository
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })
    }

    fn ensure_owner(attempt: &QuizAttempt, student_id: &str) -> AppResult<()> {
        if attempt.student_id != student_id {
            return Err(AppError::Forbidden(
                "You can only act on your own attempts".to_string(),
            ));
        }
        Ok(())
    }

    fn recorded_result(attempt: &QuizAttempt) -> AppResult<AttemptResult> {
        AttemptResult::from_attempt(attempt).ok_or_else(|| {
            AppError::InternalError(format!(
                "Terminal attempt '{}' has no recorded score",
                attempt.id
            ))
        })
    }

    pub async fn start_session(
        &self,
        student_id: &str,
        quiz_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptView> {
        let quiz = self.load_quiz(quiz_id).await?;

        let status = scheduler::quiz_status(&quiz, now);
        if status != QuizStatus::Live {
            return Err(AppError::NotLive(format!(
                "Quiz '{}' is {:?}",
                quiz_id, status
            )));
        }

        let attempt = QuizAttempt::start(student_id, quiz_id, now);
        let created = self
            .attempt_repository
            .create(attempt)
            .await
            .map_err(|err| match err {
                AppError::DuplicateAttempt(_) => AppError::DuplicateAttempt(format!(
                    "Student '{}' already has an attempt for quiz '{}'",
                    student_id, quiz_id
                )),
                other => other,
            })?;

        log::info!(
            "Attempt {} started by student {} on quiz {} at {}",
            created.id,
            student_id,
            quiz_id,
            now
        );

        Ok(AttemptView::new(created, &quiz))
    }

    pub async fn submit_answer(
        &self,
        attempt_id: &str,
        student_id: &str,
        question_id: &str,
        option_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptView> {
        let attempt = self.load_attempt(attempt_id).await?;
        Self::ensure_owner(&attempt, student_id)?;

        if attempt.is_terminal() {
            return Err(AppError::AlreadyTerminal(format!(
                "Attempt '{}' is {:?}",
                attempt_id, attempt.state
            )));
        }

        let quiz = self.load_quiz(&attempt.quiz_id).await?;

        if now > scoring::answer_cutoff(&quiz, attempt.started_at, self.grace) {
            let closed = self.close_expired(&quiz, attempt).await?;
            return Err(AppError::AlreadyTerminal(format!(
                "Attempt '{}' is {:?}",
                attempt_id, closed.state
            )));
        }

        let expected = quiz.question_at(attempt.cursor_index()).ok_or_else(|| {
            AppError::OutOfSequence(format!(
                "All {} questions of attempt '{}' are already answered",
                quiz.total_questions(),
                attempt_id
            ))
        })?;

        if expected.id != question_id {
            return Err(AppError::OutOfSequence(format!(
                "Expected an answer for question {} ('{}'), got '{}'",
                attempt.cursor + 1,
                expected.id,
                question_id
            )));
        }

        if !expected.has_option(option_id) {
            return Err(AppError::BadRequest(format!(
                "Option '{}' does not belong to question '{}'",
                option_id, question_id
            )));
        }

        let answer = LockedAnswer {
            question_id: question_id.to_string(),
            option_id: option_id.to_string(),
            answered_at: now,
        };

        match self
            .attempt_repository
            .append_answer(attempt_id, attempt.cursor, answer)
            .await?
        {
            Some(updated) => Ok(AttemptView::new(updated, &quiz)),
            None => {
                // Someone else wrote first; report what they did.
                let current = self.load_attempt(attempt_id).await?;
                if current.is_terminal() {
                    Err(AppError::AlreadyTerminal(format!(
                        "Attempt '{}' is {:?}",
                        attempt_id, current.state
                    )))
                } else {
                    Err(AppError::OutOfSequence(format!(
                        "Question {} of attempt '{}' was answered concurrently",
                        attempt.cursor + 1,
                        attempt_id
                    )))
                }
            }
        }
    }

    /// Terminal transition. Racing calls for one attempt all receive the result
    /// recorded by whichever call won the compare-and-set, alongside the quiz's
    /// summary read once that result is stored.
    pub async fn submit_session(
        &self,
        attempt_id: &str,
        student_id: &str,
        now: DateTime<Utc>,
        reason: TerminationReason,
    ) -> AppResult<SubmissionOutcome> {
        let attempt = self.load_attempt(attempt_id).await?;
        Self::ensure_owner(&attempt, student_id)?;
        let quiz = self.load_quiz(&attempt.quiz_id).await?;

        let result = self.settle_submission(&quiz, attempt, now, reason).await?;
        let attempts = self.attempt_repository.list_by_quiz(&quiz.id).await?;

        Ok(SubmissionOutcome {
            result,
            summary: scoring::summarize(&quiz.id, &attempts),
        })
    }

    /// A timeout claimed before the attempt's window closes is a manual submit.
    fn recorded_reason(
        reason: TerminationReason,
        now: DateTime<Utc>,
        closes_at: DateTime<Utc>,
    ) -> TerminationReason {
        match reason {
            TerminationReason::Timeout if now < closes_at => TerminationReason::Manual,
            other => other,
        }
    }

    async fn settle_submission(
        &self,
        quiz: &Quiz,
        mut attempt: QuizAttempt,
        now: DateTime<Utc>,
        reason: TerminationReason,
    ) -> AppResult<AttemptResult> {
        let attempt_id = attempt.id.clone();
        let closes_at = quiz.attempt_closes_at(attempt.started_at);
        let cutoff = scoring::answer_cutoff(quiz, attempt.started_at, self.grace);
        let late = now > cutoff;

        let recorded_reason = Self::recorded_reason(reason, now, closes_at);
        if recorded_reason != reason {
            log::warn!(
                "Attempt {} claimed {:?} at {} before its window closes at {}; recording {:?}",
                attempt_id,
                reason,
                now,
                closes_at,
                recorded_reason
            );
        }

        for _ in 0..MAX_SETTLE_ROUNDS {
            if attempt.is_terminal() {
                log::debug!(
                    "Submit for attempt {} observed already terminal state {:?}",
                    attempt_id,
                    attempt.state
                );
                return Self::recorded_result(&attempt);
            }

            let closure = AttemptClosure {
                state: AttemptState::Submitted,
                submitted_at: now,
                termination_reason: recorded_reason,
                score: scoring::score_attempt(quiz, &attempt, self.grace),
                late,
            };

            match self
                .attempt_repository
                .compare_and_submit(&attempt_id, attempt.cursor, closure)
                .await?
            {
                Some(submitted) => {
                    if late {
                        log::warn!(
                            "Attempt {} submitted after its window closed at {} (reason {:?}); answers after the cutoff are ignored",
                            attempt_id,
                            cutoff,
                            recorded_reason
                        );
                    }
                    log::info!(
                        "Attempt {} submitted by student {} (reason {:?}, late {})",
                        attempt_id,
                        submitted.student_id,
                        recorded_reason,
                        late
                    );
                    return Self::recorded_result(&submitted);
                }
                None => {
                    log::warn!(
                        "Submit for attempt {} lost a compare-and-set; re-reading",
                        attempt_id
                    );
                    attempt = self.load_attempt(&attempt_id).await?;
                }
            }
        }

        Err(AppError::InternalError(format!(
            "Attempt '{}' could not be settled",
            attempt_id
        )))
    }

    /// Server-side timeout: closes an attempt whose window has passed.
    async fn close_expired(&self, quiz: &Quiz, mut attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        for _ in 0..MAX_SETTLE_ROUNDS {
            if attempt.is_terminal() {
                return Ok(attempt);
            }

            let closes_at = quiz.attempt_closes_at(attempt.started_at);
            let closure = AttemptClosure {
                state: AttemptState::Expired,
                submitted_at: closes_at,
                termination_reason: TerminationReason::Timeout,
                score: scoring::score_attempt(quiz, &attempt, self.grace),
                late: false,
            };

            match self
                .attempt_repository
                .compare_and_submit(&attempt.id, attempt.cursor, closure)
                .await?
            {
                Some(expired) => {
                    log::info!(
                        "Attempt {} of student {} timed out at {} with {} of {} answered",
                        expired.id,
                        expired.student_id,
                        closes_at,
                        expired.locked_answers.len(),
                        quiz.total_questions()
                    );
                    return Ok(expired);
                }
                None => attempt = self.load_attempt(&attempt.id).await?,
            }
        }

        Err(AppError::InternalError(format!(
            "Attempt '{}' could not be settled",
            attempt.id
        )))
    }

    /// Resumes the student's attempt, closing it first if its window has passed.
    pub async fn current_session(
        &self,
        student_id: &str,
        quiz_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptView> {
        let attempt = self
            .attempt_repository
            .find_by_student_and_quiz(student_id, quiz_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Student '{}' has no attempt for quiz '{}'",
                    student_id, quiz_id
                ))
            })?;
        let quiz = self.load_quiz(quiz_id).await?;

        let attempt = if !attempt.is_terminal()
            && now > scoring::answer_cutoff(&quiz, attempt.started_at, self.grace)
        {
            self.close_expired(&quiz, attempt).await?
        } else {
            attempt
        };

        Ok(AttemptView::new(attempt, &quiz))
    }

    pub async fn get_attempt(&self, attempt_id: &str, student_id: &str) -> AppResult<AttemptView> {
        let attempt = self.load_attempt(attempt_id).await?;
        Self::ensure_owner(&attempt, student_id)?;
        let quiz = self.load_quiz(&attempt.quiz_id).await?;
        Ok(AttemptView::new(attempt, &quiz))
    }

    /// Closes every in-progress attempt whose window has passed. Returns how many
    /// attempts this call closed.
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let in_progress = self.attempt_repository.list_in_progress().await?;
        let mut quizzes: HashMap<String, Quiz> = HashMap::new();
        let mut closed = 0;

        for attempt in in_progress {
            if !quizzes.contains_key(&attempt.quiz_id) {
                match self.load_quiz(&attempt.quiz_id).await {
                    Ok(quiz) => {
                        quizzes.insert(quiz.id.clone(), quiz);
                    }
                    Err(err) => {
                        log::warn!("Skipping attempt {} during expiry: {}", attempt.id, err);
                        continue;
                    }
                }
            }
            let Some(quiz) = quizzes.get(&attempt.quiz_id) else {
                continue;
            };

            if now <= scoring::answer_cutoff(quiz, attempt.started_at, self.grace) {
                continue;
            }

            let attempt_id = attempt.id.clone();
            match self.close_expired(quiz, attempt).await {
                Ok(expired) if expired.state == AttemptState::Expired => closed += 1,
                Ok(_) => {}
                Err(err) => log::warn!("Failed to expire attempt {}: {}", attempt_id, err),
            }
        }

        Ok(closed)
    }
}
