//! Review persistence for Silex.
//!
//! This crate defines the [`ReviewRepository`] trait, a storage interface
//! for flat review records that knows nothing about validation, moderation
//! rules, or HTTP. The `silex-core` review store wraps a repository and
//! enforces those rules before anything reaches this layer.
//!
//! Three implementations are provided:
//!
//! - [`RedbRepository`] — pure-Rust embedded default (feature `redb-backend`)
//! - [`PostgresRepository`] — a `reviews` table in PostgreSQL (feature `postgres-backend`)
//! - [`MemoryRepository`] — in-memory, for development and tests

mod error;
mod memory;
#[cfg(feature = "postgres-backend")]
mod postgres_backend;
mod record;
#[cfg(feature = "redb-backend")]
mod redb_backend;

pub use error::StorageError;
pub use memory::MemoryRepository;
#[cfg(feature = "postgres-backend")]
pub use postgres_backend::PostgresRepository;
pub use record::{NewReviewRecord, ReviewRecord};
#[cfg(feature = "redb-backend")]
pub use redb_backend::RedbRepository;

/// A pluggable review repository.
///
/// Records are keyed by a store-assigned `u64` id. Ids are allocated by the
/// repository on [`insert`](ReviewRepository::insert), are never reused, and
/// the remaining fields of a record are opaque to this layer apart from the
/// `approved` flag, which is the only field that may change after insert.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait ReviewRepository: Send + Sync + 'static {
    /// Persist a new record, assigning its id and creation timestamp.
    ///
    /// The returned record always has `approved = false`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn insert(&self, record: NewReviewRecord) -> Result<ReviewRecord, StorageError>;

    /// Fetch a single record by id.
    ///
    /// Returns `Ok(None)` if no record with that id exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn get(&self, id: u64) -> Result<Option<ReviewRecord>, StorageError>;

    /// List records, newest first (`created_at` descending, then `id`
    /// descending).
    ///
    /// When `approved_only` is set, pending records are excluded. `limit`
    /// caps the number of returned records.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::List`] if the underlying backend fails.
    async fn list(
        &self,
        approved_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewRecord>, StorageError>;

    /// Set the `approved` flag on an existing record.
    ///
    /// Returns the updated record, or `Ok(None)` if the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn set_approved(
        &self,
        id: u64,
        approved: bool,
    ) -> Result<Option<ReviewRecord>, StorageError>;

    /// Remove a record permanently.
    ///
    /// Returns `true` if a record was removed, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Delete`] if the underlying backend fails.
    async fn delete(&self, id: u64) -> Result<bool, StorageError>;

    /// Short backend name for health output and logs.
    fn kind(&self) -> &'static str;
}

/// Sort records newest first and apply an optional cap.
///
/// Shared by backends that cannot order inside the storage engine itself.
pub(crate) fn newest_first(mut records: Vec<ReviewRecord>, limit: Option<usize>) -> Vec<ReviewRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    records
}
