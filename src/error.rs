//! Error types for recoverable failures.
//!
//! Book operations themselves never fail: a cancel of an unknown order is an
//! empty `Option`, and executing more than is open is a panic.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while building orders or loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Order quantity must be strictly positive
    #[error("invalid quantity {0}: must be greater than zero")]
    InvalidQuantity(Decimal),

    /// Limit price must be strictly positive
    #[error("invalid price {0}: must be greater than zero")]
    InvalidPrice(Decimal),

    /// Unrecognised cross policy name
    #[error("unknown cross policy: {0}")]
    UnknownCrossPolicy(String),
}

/// Result type for fallible order operations
pub type OrderResult<T> = Result<T, OrderError>;
