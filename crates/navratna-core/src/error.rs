//! # Error Types
//!
//! Domain-specific error types for navratna-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  navratna-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  navratna-db errors                                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  navratna-api errors                                                   │
//! │  └── ApiError         - What the frontend sees (JSON + status)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The stone cannot be sold in its current state.
    ///
    /// ## When This Occurs
    /// - Recording a sale for a stone already marked `Sold`
    /// - Moving a sale onto a stone another sale owns
    #[error("Stone {stone_code} is {status}, cannot be sold")]
    StoneNotAvailable { stone_code: String, status: String },

    /// Certification status can only move one step forward.
    #[error("Cannot move certification from {from} to {to}")]
    InvalidCertificationTransition { from: String, to: String },

    /// A lookup table has no entry for the requested gem type.
    #[error("Unknown gem type: {0}")]
    UnknownGemType(String),

    /// A lookup table has no entry for the requested zodiac sign or planet.
    #[error("Unknown {kind}: {value}")]
    UnknownAstrologicalKey { kind: String, value: String },

    /// Unknown HSN/SAC code.
    #[error("Unknown HSN/SAC code: {0}")]
    UnknownHsnCode(String),

    /// Paid amount inconsistent with the stated payment status.
    #[error("Payment status {status} does not match amount paid {paid} of {total}")]
    InconsistentPaymentStatus {
        status: String,
        paid: i64,
        total: i64,
    },

    /// Invoice has no billable lines or exceeds the line limit.
    #[error("Invalid invoice: {reason}")]
    InvalidInvoice { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These mirror the form-level checks of the frontend so that a request
/// that bypasses the UI still gets the same answer.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid GSTIN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for a `Required` error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::StoneNotAvailable {
            stone_code: "RUB-0001".to_string(),
            status: "Sold".to_string(),
        };
        assert_eq!(err.to_string(), "Stone RUB-0001 is Sold, cannot be sold");

        let err = CoreError::InvalidCertificationTransition {
            from: "Pending".to_string(),
            to: "Certified".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot move certification from Pending to Certified"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "notes".to_string(),
            max: 2000,
        };
        assert_eq!(err.to_string(), "notes must be at most 2000 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("carat").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
