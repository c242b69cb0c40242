//! Error types for ledger operations.

use thiserror::Error;

use crate::storage::StorageError;

/// An input the ledger refused. The snapshot is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("water amount must be positive")]
    NonPositiveWater,

    #[error("water total cannot be negative, got {0} ml")]
    NegativeWater(i64),

    #[error("water total of {0} ml is too large")]
    WaterTooLarge(i64),

    #[error("{kind} name cannot be empty")]
    EmptyName { kind: &'static str },

    #[error("workout duration must be at least one minute")]
    NonPositiveDuration,

    #[error("{field} must be a non-negative number of grams, got {value}")]
    InvalidMacro { field: &'static str, value: f64 },

    #[error("goal {field} must be a positive integer, got {value}")]
    InvalidGoal { field: &'static str, value: i64 },
}

/// Errors returned by [`crate::LedgerStore`] operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
