use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {0} text cannot be empty")]
    EmptyText(QuestionId),

    #[error("question {0} has no options")]
    NoOptions(QuestionId),

    #[error("question {0} has no correct option")]
    NoCorrectOption(QuestionId),

    #[error("question {id} has {count} correct options, expected exactly one")]
    MultipleCorrectOptions { id: QuestionId, count: usize },

    #[error("question {question} lists option {option} more than once")]
    DuplicateOption { question: QuestionId, option: OptionId },
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// One selectable answer for a quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn correct(id: OptionId, text: impl Into<String>) -> Self {
        Self::new(id, text, true)
    }

    #[must_use]
    pub fn wrong(id: OptionId, text: impl Into<String>) -> Self {
        Self::new(id, text, false)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<AnswerOption>,
}

impl Question {
    /// Build a question, checking that exactly one option is marked correct.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text is blank, options are missing or
    /// duplicated, or the number of correct options is not exactly one.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText(id));
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions(id));
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.id) {
                return Err(QuestionError::DuplicateOption {
                    question: id,
                    option: option.id,
                });
            }
        }

        match options.iter().filter(|o| o.is_correct).count() {
            0 => Err(QuestionError::NoCorrectOption(id)),
            1 => Ok(Self { id, text, options }),
            count => Err(QuestionError::MultipleCorrectOptions { id, count }),
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    #[must_use]
    pub fn has_option(&self, id: OptionId) -> bool {
        self.option(id).is_some()
    }

    /// The single correct option. Always present after construction.
    #[must_use]
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.is_correct)
    }

    #[must_use]
    pub fn is_correct(&self, choice: OptionId) -> bool {
        self.option(choice).is_some_and(|o| o.is_correct)
    }
}
