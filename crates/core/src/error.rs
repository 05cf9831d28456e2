//! Errors raised by the loyalty domain model itself.
//!
//! Collaborator failures (settings store, order directory, ledger) are not
//! represented here; each seam in `loyalty-points` carries its own error.

use thiserror::Error;

/// A deterministic domain failure: bad input or a broken account rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input rejected at construction (negative money, empty reason, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// State that must never occur, such as a command routed to the wrong account.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The command contradicts existing history.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A point quantity does not fit in an `i64`.
    #[error("point arithmetic overflow: {0}")]
    Overflow(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }
}
