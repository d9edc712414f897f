//! # Error Types
//!
//! Domain-specific error types for stockpile-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockpile-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Product form validation failures               │
//! │                                                                         │
//! │  stockpile-store errors (separate crate)                               │
//! │  └── StoreError       - Key-value store failures                       │
//! │                                                                         │
//! │  stockpile-app errors                                                  │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core inventory errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// The inventory itself treats a missing id as a no-op; this variant is
    /// raised by callers that want to surface the condition.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A persisted snapshot could not be encoded or decoded.
    ///
    /// ## When This Occurs
    /// - The stored `@products` value is not a JSON array of products
    /// - The stored `@categories` value is not a JSON array of strings
    #[error("Snapshot {key} could not be (de)serialized: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A product's price is NaN or infinite, which JSON cannot hold.
    ///
    /// Raised when encoding `@products`, so the previous stored snapshot
    /// stays in place.
    #[error("Product {id} has a non-finite price")]
    NonFinitePrice { id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
/// The inventory never raises them itself: callers validate first.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Text could not be parsed as a number.
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    /// Category is not part of the category set.
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    /// Name is taken by the list screen's "every category" chip.
    #[error("'{0}' is reserved and cannot be used as a category")]
    ReservedCategory(String),
}

impl ValidationError {
    /// Name of the offending field, for highlighting in a form.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidNumber { field, .. } => field,
            ValidationError::UnknownCategory(_) | ValidationError::ReservedCategory(_) => {
                "category"
            }
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
