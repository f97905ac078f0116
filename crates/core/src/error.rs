//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Covers deterministic business failures only (rejected commands, broken
/// invariants). Transport failures belong to the client crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A command carried input the domain cannot accept.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant would be violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A referenced entity is not part of the current state.
    #[error("not found: {0}")]
    NotFound(String),

    /// The command is not allowed in the current lifecycle state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
