//! Error types for the points module.
//!
//! Each collaborator seam has its own error so callers can tell an expected
//! business rejection (insufficient points) apart from a missing setting or an
//! unavailable dependency.

use thiserror::Error;

use loyalty_core::{DomainError, MemberId, OrderSn};

/// Failure reading the point-rate setting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("point setting is not configured")]
    ConfigurationMissing,

    #[error("point setting is invalid: {0}")]
    Invalid(String),

    #[error("configuration store unavailable: {0}")]
    Unavailable(String),
}

/// Failure resolving an order by its serial number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderLookupError {
    #[error("order not found: {0}")]
    NotFound(OrderSn),

    #[error("order directory unavailable: {0}")]
    Unavailable(String),
}

/// Failure applying an adjustment to a member's point account.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The debit would drive the balance below zero. Nothing was applied.
    #[error(
        "insufficient points for member {member_id}: available {available}, requested {requested}"
    )]
    InsufficientBalance {
        member_id: MemberId,
        available: i64,
        requested: i64,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Error surface of point accrual.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("point setting is not configured")]
    ConfigurationMissing,

    #[error("point setting is invalid: {0}")]
    InvalidConfiguration(String),

    #[error("order not found: {0}")]
    OrderNotFound(OrderSn),

    /// Business rejection: the member does not hold enough points.
    #[error("insufficient points: member {member_id} holds {available}, {requested} required")]
    InsufficientPoints {
        member_id: MemberId,
        available: i64,
        requested: i64,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Unexpected collaborator failure, message passed through unchanged.
    #[error("{0}")]
    Collaborator(String),
}

impl PolicyError {
    /// True for rejections the member can act on (as opposed to system faults).
    pub fn is_business_rejection(&self) -> bool {
        matches!(self, PolicyError::InsufficientPoints { .. })
    }
}

impl From<ConfigError> for PolicyError {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::ConfigurationMissing => PolicyError::ConfigurationMissing,
            ConfigError::Invalid(msg) => PolicyError::InvalidConfiguration(msg),
            other @ ConfigError::Unavailable(_) => PolicyError::Collaborator(other.to_string()),
        }
    }
}

impl From<OrderLookupError> for PolicyError {
    fn from(value: OrderLookupError) -> Self {
        match value {
            OrderLookupError::NotFound(sn) => PolicyError::OrderNotFound(sn),
            other @ OrderLookupError::Unavailable(_) => PolicyError::Collaborator(other.to_string()),
        }
    }
}

impl From<LedgerError> for PolicyError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::InsufficientBalance {
                member_id,
                available,
                requested,
            } => PolicyError::InsufficientPoints {
                member_id,
                available,
                requested,
            },
            LedgerError::Domain(e) => PolicyError::Domain(e),
            other @ LedgerError::Unavailable(_) => PolicyError::Collaborator(other.to_string()),
        }
    }
}
