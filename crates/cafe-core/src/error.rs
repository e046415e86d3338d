//! # Error Types
//!
//! Domain-specific error types for cafe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  cafe-core errors (this file)                               │
//! │  └── ValidationError  - input rejected before any write     │
//! │                                                             │
//! │  cafe-db errors (separate crate)                            │
//! │  └── DbError          - not-found, duplicates, transitions, │
//! │                         storage failures                    │
//! │                                                             │
//! │  Flow: ValidationError → DbError → GUI message              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, limits)
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Input validation errors.
///
/// These occur before business logic runs and never leave partial state
/// behind: a validation failure means zero writes were issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    /// Creates a Required error for a given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;
