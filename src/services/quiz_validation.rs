use crate::{
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

pub const MIN_QUESTIONS: usize = 2;
pub const MAX_QUESTIONS: usize = 10;
pub const MIN_OPTIONS: usize = 2;

/// Structural checks gating Draft -> Published. Reports every problem at once.
pub fn validate_for_publish(quiz: &Quiz) -> AppResult<()> {
    let mut issues = Vec::new();

    if quiz.title.trim().is_empty() {
        issues.push("title is missing".to_string());
    }

    if quiz.duration_minutes == 0 {
        issues.push("duration must be positive".to_string());
    }

    let count = quiz.questions.len();
    if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&count) {
        issues.push(format!(
            "quiz must have between {} and {} questions (has {})",
            MIN_QUESTIONS, MAX_QUESTIONS, count
        ));
    }

    for (index, question) in quiz.questions.iter().enumerate() {
        let number = index + 1;

        if question.options.len() < MIN_OPTIONS {
            issues.push(format!(
                "question {} needs at least {} options (has {})",
                number,
                MIN_OPTIONS,
                question.options.len()
            ));
        }

        let correct = question.options.iter().filter(|opt| opt.correct).count();
        if correct != 1 {
            issues.push(format!(
                "question {} must have exactly one correct option (has {})",
                number, correct
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(issues.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{draft_quiz, question};

    fn message(result: AppResult<()>) -> String {
        match result {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn well_formed_draft_passes() {
        assert!(validate_for_publish(&draft_quiz(2)).is_ok());
        assert!(validate_for_publish(&draft_quiz(10)).is_ok());
    }

    #[test]
    fn question_count_bounds() {
        assert!(message(validate_for_publish(&draft_quiz(1))).contains("between 2 and 10"));
        assert!(message(validate_for_publish(&draft_quiz(11))).contains("has 11"));
        assert!(validate_for_publish(&draft_quiz(0)).is_err());
    }

    #[test]
    fn two_correct_options_rejected() {
        let mut quiz = draft_quiz(2);
        quiz.questions[0].options[0].correct = true;

        let msg = message(validate_for_publish(&quiz));
        assert!(msg.contains("question 1 must have exactly one correct option (has 2)"));
    }

    #[test]
    fn no_correct_option_rejected() {
        let mut quiz = draft_quiz(2);
        quiz.questions[1]
            .options
            .iter_mut()
            .for_each(|opt| opt.correct = false);

        assert!(message(validate_for_publish(&quiz)).contains("question 2"));
    }

    #[test]
    fn single_option_rejected() {
        let mut quiz = draft_quiz(3);
        quiz.questions[2] = question(2);
        quiz.questions[2].options.truncate(1);
        quiz.questions[2].options[0].correct = true;

        assert!(message(validate_for_publish(&quiz)).contains("at least 2 options"));
    }

    #[test]
    fn missing_title_and_duration_rejected() {
        let mut quiz = draft_quiz(2);
        quiz.title = "   ".to_string();
        quiz.duration_minutes = 0;

        let msg = message(validate_for_publish(&quiz));
        assert!(msg.contains("title is missing"));
        assert!(msg.contains("duration must be positive"));
    }
}
