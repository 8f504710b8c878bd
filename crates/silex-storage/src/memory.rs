//! In-memory review repository.
//!
//! Stores all records in a `BTreeMap` behind a `RwLock`. It is not
//! persistent: all reviews are lost when the process exits. Use this for
//! local development and for tests that need a real repository without
//! touching disk.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{NewReviewRecord, ReviewRecord, ReviewRepository, StorageError, newest_first};

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<u64, ReviewRecord>,
    last_id: u64,
}

/// An in-memory repository backed by a `BTreeMap`.
///
/// Thread-safe and async-compatible. Cloning shares the same underlying
/// data, so a clone handed to a test observes every write.
///
/// # Examples
///
/// ```
/// # use silex_storage::{MemoryRepository, NewReviewRecord, ReviewRepository};
/// # #[tokio::main]
/// # async fn main() {
/// let repo = MemoryRepository::new();
/// let saved = repo
///     .insert(NewReviewRecord {
///         author: "Ivan".to_owned(),
///         company: String::new(),
///         role: String::new(),
///         text: "Great blocks".to_owned(),
///         stars: 5,
///     })
///     .await
///     .unwrap();
/// assert_eq!(saved.id, 1);
/// assert!(!saved.approved);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ReviewRepository for MemoryRepository {
    async fn insert(&self, record: NewReviewRecord) -> Result<ReviewRecord, StorageError> {
        let mut inner = self.inner.write().await;
        let id = inner.last_id.checked_add(1).ok_or_else(|| StorageError::Write {
            reason: "review id space exhausted".to_owned(),
        })?;
        inner.last_id = id;
        let saved = record.into_record(id, Utc::now());
        inner.records.insert(id, saved.clone());
        Ok(saved)
    }

    async fn get(&self, id: u64) -> Result<Option<ReviewRecord>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&id).cloned())
    }

    async fn list(
        &self,
        approved_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewRecord>, StorageError> {
        let inner = self.inner.read().await;
        let records = inner
            .records
            .values()
            .filter(|r| !approved_only || r.approved)
            .cloned()
            .collect();
        Ok(newest_first(records, limit))
    }

    async fn set_approved(
        &self,
        id: u64,
        approved: bool,
    ) -> Result<Option<ReviewRecord>, StorageError> {
        let mut inner = self.inner.write().await;
        Ok(inner.records.get_mut(&id).map(|r| {
            r.approved = approved;
            r.clone()
        }))
    }

    async fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        Ok(inner.records.remove(&id).is_some())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(author: &str, stars: u8) -> NewReviewRecord {
        NewReviewRecord {
            author: author.to_owned(),
            company: String::new(),
            role: String::new(),
            text: format!("review by {author}"),
            stars,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let repo = MemoryRepository::new();
        let a = repo.insert(draft("a", 5)).await.unwrap();
        let b = repo.insert(draft("b", 4)).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(!a.approved && !b.approved);
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.get(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = MemoryRepository::new();
        let a = repo.insert(draft("a", 5)).await.unwrap();
        assert!(repo.delete(a.id).await.unwrap());
        let b = repo.insert(draft("b", 5)).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let repo = MemoryRepository::new();
        let a = repo.insert(draft("a", 5)).await.unwrap();
        let b = repo.insert(draft("b", 3)).await.unwrap();
        let c = repo.insert(draft("c", 1)).await.unwrap();
        repo.set_approved(a.id, true).await.unwrap();
        repo.set_approved(c.id, true).await.unwrap();

        let all: Vec<u64> = repo.list(false, None).await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(all, vec![c.id, b.id, a.id]);

        let public: Vec<u64> = repo.list(true, None).await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(public, vec![c.id, a.id]);
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let repo = MemoryRepository::new();
        for i in 0..5 {
            repo.insert(draft(&format!("r{i}"), 5)).await.unwrap();
        }
        assert_eq!(repo.list(false, Some(3)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn set_approved_missing_returns_none() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.set_approved(9, true).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_missing_returns_false() {
        let repo = MemoryRepository::new();
        assert!(!repo.delete(9).await.unwrap());
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let repo = MemoryRepository::new();
        let clone = repo.clone();
        let saved = repo.insert(draft("a", 2)).await.unwrap();
        assert_eq!(clone.get(saved.id).await.unwrap(), Some(saved));
    }
}
