//! Error taxonomy for board operations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Bad create input; nothing was inserted.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("invalid status: {0} (expected todo, inprogress or done)")]
    InvalidStatus(String),
}

impl BoardError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
