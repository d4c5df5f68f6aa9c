//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Item description cannot be empty")]
    EmptyDescription,

    #[error("Item description is too long ({length} characters, max {max})")]
    DescriptionTooLong { length: usize, max: usize },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Unknown turn: {0}")]
    UnknownTurn(u64),

    #[error("Turn {0} is not an assistant turn")]
    NotAssistantTurn(u64),

    #[error("Invalid language: {0}")]
    InvalidLanguage(String),
}
