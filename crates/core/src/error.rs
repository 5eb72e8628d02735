//! Domain error model.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (validation, bad identifiers,
/// decoding). Transport concerns belong to the client crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A form payload failed its schema.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A record could not be decoded from its wire shape.
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}
