use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<QuizQuestionOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestionOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
}

impl QuizQuestion {
    pub fn new(text: &str, options: Vec<QuizQuestionOption>) -> Self {
        QuizQuestion {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            options,
        }
    }

    /// The single correct option, if the question is well formed.
    pub fn correct_option_id(&self) -> Option<&str> {
        let mut correct = self.options.iter().filter(|opt| opt.correct);
        match (correct.next(), correct.next()) {
            (Some(option), None) => Some(option.id.as_str()),
            _ => None,
        }
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|opt| opt.id == option_id)
    }
}

impl QuizQuestionOption {
    pub fn new(text: &str, correct: bool) -> Self {
        QuizQuestionOption {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            correct,
        }
    }
}
