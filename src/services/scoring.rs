//! Attempt scoring and class-wide aggregation. Both are recomputed from stored
//! attempts on demand; nothing here keeps running totals.

use chrono::{DateTime, Duration, Utc};

use crate::models::domain::quiz_attempt::{AttemptScore, LockedAnswer};
use crate::models::domain::{AttemptResult, Quiz, QuizAttempt, RankedResult, ResultSummary};

/// Last instant at which an answer for an attempt started at `started_at` still counts.
pub fn answer_cutoff(quiz: &Quiz, started_at: DateTime<Utc>, grace: Duration) -> DateTime<Utc> {
    quiz.attempt_closes_at(started_at) + grace
}

/// Unanswered questions, and answers locked after `cutoff`, count as incorrect.
pub fn score_answers(quiz: &Quiz, answers: &[LockedAnswer], cutoff: DateTime<Utc>) -> AttemptScore {
    let correct = answers
        .iter()
        .filter(|answer| answer.answered_at <= cutoff)
        .filter(|answer| {
            quiz.find_question(&answer.question_id)
                .and_then(|q| q.correct_option_id())
                .is_some_and(|correct_id| correct_id == answer.option_id)
        })
        .count() as u32;

    let total = quiz.total_questions();
    let percent = if total == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(total) * 100.0
    };

    AttemptScore {
        correct,
        total,
        percent,
        passed: percent >= f64::from(quiz.passing_score_percent),
    }
}

/// Score recorded when an attempt closes, whoever closes it.
pub fn score_attempt(quiz: &Quiz, attempt: &QuizAttempt, grace: Duration) -> AttemptScore {
    let cutoff = answer_cutoff(quiz, attempt.started_at, grace);
    score_answers(quiz, &attempt.locked_answers, cutoff)
}

/// Ranks terminal attempts by correct answers, earlier submission first on a tie.
pub fn summarize(quiz_id: &str, attempts: &[QuizAttempt]) -> ResultSummary {
    let mut results: Vec<AttemptResult> = attempts
        .iter()
        .filter(|a| a.quiz_id == quiz_id && a.is_terminal())
        .filter_map(AttemptResult::from_attempt)
        .collect();

    results.sort_by(|a, b| {
        b.correct
            .cmp(&a.correct)
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
            .then_with(|| a.attempt_id.cmp(&b.attempt_id))
    });

    let attempt_count = results.len() as u32;
    let pass_count = results.iter().filter(|r| r.passed).count() as u32;
    let class_average = if results.is_empty() {
        None
    } else {
        Some(results.iter().map(|r| r.percent).sum::<f64>() / f64::from(attempt_count))
    };

    ResultSummary {
        quiz_id: quiz_id.to_string(),
        attempt_count,
        pass_count,
        class_average,
        results: results
            .into_iter()
            .enumerate()
            .map(|(index, result)| RankedResult {
                rank: index as u32 + 1,
                result,
            })
            .collect(),
    }
}
