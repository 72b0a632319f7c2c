pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod quiz_status;
pub mod results;
pub use quiz::{PublishState, Quiz, ReleasePolicy};
pub use quiz_attempt::{AttemptState, QuizAttempt, TerminationReason};
pub use quiz_question::{QuizQuestion, QuizQuestionOption};
pub use quiz_status::{EffectiveStatus, QuizStatus};
pub use results::{AttemptResult, RankedResult, ResultSummary, SubmissionOutcome};
