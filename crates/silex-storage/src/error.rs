//! Storage error types.
//!
//! Every error variant carries enough context to diagnose the problem
//! without a debugger.

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to open or connect to the storage backend.
    #[error("failed to open storage at '{path}': {reason}")]
    Open { path: String, reason: String },

    /// Failed to read a record.
    #[error("failed to read review {id}: {reason}")]
    Read { id: u64, reason: String },

    /// Failed to write a record.
    #[error("failed to write review: {reason}")]
    Write { reason: String },

    /// Failed to delete a record.
    #[error("failed to delete review {id}: {reason}")]
    Delete { id: u64, reason: String },

    /// Failed to list records.
    #[error("failed to list reviews: {reason}")]
    List { reason: String },

    /// Failed to begin or commit a transaction.
    #[error("transaction failed: {reason}")]
    Transaction { reason: String },

    /// A stored record could not be decoded.
    #[error("corrupt review record {id}: {reason}")]
    Corrupt { id: u64, reason: String },
}
