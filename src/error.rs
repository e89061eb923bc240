//! Custom error types for SplitLedger
//!
//! This module defines the error hierarchy for the ledger using thiserror.
//! The engine and service layers never retry or silently correct bad input:
//! every failure surfaces here before any mutation is applied.

use thiserror::Error;

use crate::models::Money;

/// The main error type for SplitLedger operations
#[derive(Error, Debug)]
pub enum SplitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Generic validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// An expense failed validation (payer sum, participants, amount)
    #[error("Invalid expense: {0}")]
    InvalidExpenseData(String),

    /// A payment amount is not in `(0, outstanding]`
    #[error("Invalid amount {requested}: must be greater than $0.00 and at most {outstanding}")]
    InvalidAmount { requested: Money, outstanding: Money },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SplitError {
    /// Create a "not found" error for people
    pub fn person_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Person",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for settlements
    pub fn settlement_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Settlement",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error rejected caller input (as opposed to an I/O failure)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidExpenseData(_) | Self::InvalidAmount { .. }
        )
    }
}

impl From<std::io::Error> for SplitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SplitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for SplitLedger operations
pub type SplitResult<T> = Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SplitError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = SplitError::person_not_found("Alice");
        assert_eq!(err.to_string(), "Person not found: Alice");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_amount_error() {
        let err = SplitError::InvalidAmount {
            requested: Money::from_cents(6000),
            outstanding: Money::from_cents(5000),
        };
        assert_eq!(
            err.to_string(),
            "Invalid amount $60.00: must be greater than $0.00 and at most $50.00"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SplitError = io_err.into();
        assert!(matches!(err, SplitError::Io(_)));
        assert!(!err.is_validation());
    }
}
