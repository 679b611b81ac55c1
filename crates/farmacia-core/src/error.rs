//! # Error Types
//!
//! Domain-specific error types for farmacia-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  farmacia-core errors (this file)                                      │
//! │  ├── CoreError        - Ticket / quote errors                          │
//! │  └── ValidationError  - Back-office input validation failures          │
//! │                                                                         │
//! │  price-check errors (app crate)                                        │
//! │  └── AppError         - Config, files, arguments                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → stderr                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Price resolution itself never returns an error: malformed numbers are
//! coerced or clamped and reported as [`crate::types::PricingWarning`]s.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quoted quantity exceeds the per-line maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A ticket amount does not fit in `i64` cents.
    #[error("Amount overflow computing {field}")]
    AmountOverflow { field: &'static str },

    /// A product document could not be decoded at all (not even leniently).
    #[error("Invalid product document: {reason}")]
    InvalidDocument { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used by the back office when a promotion schedule is edited. The
/// resolver never raises these; it clamps instead.
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
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., NaN, unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date window ends before it starts.
    #[error("{field} ends ({end}) before it starts ({start})")]
    InvertedWindow {
        field: String,
        start: String,
        end: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
