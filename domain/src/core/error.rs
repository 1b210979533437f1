//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unknown decision: {0}")]
    UnknownDecision(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown candidate category: {0}")]
    UnknownCategory(String),

    #[error("Unknown trip status: {0}")]
    UnknownTripStatus(String),

    #[error("Invalid quorum rule: {0}")]
    InvalidRule(String),
}

impl DomainError {
    /// Check if this error came from parsing user-supplied text
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, DomainError::InvalidIdentifier(_))
    }
}
