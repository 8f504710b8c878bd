//! Error types for `silex-core`.
//!
//! Each error variant carries enough context to diagnose the problem without
//! a debugger. User-facing messages are kept separate from these variants;
//! the HTTP layer decides what a visitor sees.

use silex_storage::StorageError;

/// A single rule a review draft can break.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    #[error("field '{field}' is required")]
    Missing { field: &'static str },

    /// A text field exceeds its maximum length.
    #[error("field '{field}' exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// The star rating is missing or outside 1..=5.
    #[error("stars must be between 1 and 5, got {stars}")]
    Stars { stars: i64 },
}

/// Errors from review store operations.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// The submitted draft failed validation.
    #[error("invalid review: {0}")]
    Invalid(#[from] ValidationError),

    /// No review exists with the given id (never created, or deleted).
    #[error("review {id} not found")]
    NotFound { id: u64 },

    /// The moderation action string is not one of approve, reject, delete.
    #[error("unknown moderation action '{action}'")]
    UnknownAction { action: String },

    /// The underlying repository returned an error.
    #[error("review storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from lead capture.
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    /// Name or phone missing.
    #[error("lead field '{field}' is required")]
    Missing { field: &'static str },

    /// The notifier could not deliver the lead.
    #[error("lead notification failed: {reason}")]
    Delivery { reason: String },
}
