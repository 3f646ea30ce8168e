//! # Error Types
//!
//! Domain-specific error types for intake-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  intake-core errors (this file)                                        │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── SubmissionError  - Malformed form input (user-facing 400)         │
//! │                                                                         │
//! │  intake-store errors (separate crate)                                  │
//! │  └── StoreError       - Config file load/persist failures              │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - What the browser sees (status + message)       │
//! │                                                                         │
//! │  Flow: SubmissionError → ApiError(400)                                 │
//! │        StoreError      → startup abort / ApiError(500)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The counter cannot be advanced without overflowing.
    ///
    /// Advancing must never wrap around, because a wrapped counter would
    /// re-issue reference numbers that are already on paper.
    #[error("Reference counter {counter} cannot be advanced any further")]
    CounterExhausted { counter: u64 },

    /// A configuration value breaks a rule that parsing alone cannot check.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// =============================================================================
// Submission Error
// =============================================================================

/// Input errors in a submitted intake form.
///
/// These are request-scoped: the request is answered with a 4xx and the
/// server keeps serving.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// The birth date is not a `YYYY-MM-DD` calendar date.
    #[error("{field} has invalid format: expected YYYY-MM-DD, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CounterExhausted { counter: u64::MAX };
        assert!(err.to_string().contains("cannot be advanced"));

        let err = SubmissionError::Required { field: "fname" };
        assert_eq!(err.to_string(), "fname is required");

        let err = SubmissionError::InvalidDate {
            field: "bday",
            value: "15.06.2006".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "bday has invalid format: expected YYYY-MM-DD, got '15.06.2006'"
        );
    }
}
