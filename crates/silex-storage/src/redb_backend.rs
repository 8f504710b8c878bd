//! Pure-Rust redb review repository.
//!
//! The default persistent backend: a single file, no external services, no
//! C/C++ toolchain. Feature-gated behind `redb-backend`.
//!
//! Records are stored as JSON in a `reviews` table keyed by id. The id
//! counter lives in a `meta` table and is advanced in the same write
//! transaction as the insert, so ids survive restarts and are never reused.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};

use crate::{NewReviewRecord, ReviewRecord, ReviewRepository, StorageError, newest_first};

const REVIEWS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("reviews");
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");
const LAST_ID_KEY: &str = "last_id";

/// A review repository backed by redb.
///
/// Thread-safe via `Arc<Database>`. Blocking redb calls are offloaded to the
/// Tokio blocking thread pool.
///
/// # Examples
///
/// ```no_run
/// # use silex_storage::RedbRepository;
/// let repo = RedbRepository::open("/var/lib/silex/reviews.redb").unwrap();
/// ```
#[derive(Clone)]
pub struct RedbRepository {
    db: Arc<Database>,
    path: PathBuf,
}

impl std::fmt::Debug for RedbRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbRepository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn txn_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Transaction {
        reason: e.to_string(),
    }
}

fn encode(record: &ReviewRecord) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(record).map_err(|e| StorageError::Write {
        reason: format!("serialization failed: {e}"),
    })
}

fn decode(id: u64, bytes: &[u8]) -> Result<ReviewRecord, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Corrupt {
        id,
        reason: e.to_string(),
    })
}

impl RedbRepository {
    /// Open or create a redb database at the given path.
    ///
    /// Parent directories are created when missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if redb fails to open or create the
    /// database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let open_err = |reason: String| StorageError::Open {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| open_err(e.to_string()))?;
        }

        let db = Database::create(path).map_err(|e| open_err(e.to_string()))?;

        // Opening the tables in a write txn creates them if missing.
        let txn = db.begin_write().map_err(txn_err)?;
        {
            txn.open_table(REVIEWS_TABLE)
                .map_err(|e| open_err(format!("reviews table: {e}")))?;
            txn.open_table(META_TABLE)
                .map_err(|e| open_err(format!("meta table: {e}")))?;
        }
        txn.commit().map_err(txn_err)?;

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
        })
    }

    /// Return the filesystem path of this database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| StorageError::Transaction {
                reason: format!("blocking task panicked: {e}"),
            })?
    }
}

#[async_trait::async_trait]
impl ReviewRepository for RedbRepository {
    async fn insert(&self, record: NewReviewRecord) -> Result<ReviewRecord, StorageError> {
        self.blocking(move |db| {
            let txn = db.begin_write().map_err(txn_err)?;
            let saved = {
                let mut meta = txn.open_table(META_TABLE).map_err(txn_err)?;
                let last = meta
                    .get(LAST_ID_KEY)
                    .map_err(|e| StorageError::Write {
                        reason: e.to_string(),
                    })?
                    .map_or(0, |v| v.value());
                let id = last.checked_add(1).ok_or_else(|| StorageError::Write {
                    reason: "review id space exhausted".to_owned(),
                })?;
                meta.insert(LAST_ID_KEY, id).map_err(|e| StorageError::Write {
                    reason: e.to_string(),
                })?;

                let saved = record.into_record(id, Utc::now());
                let bytes = encode(&saved)?;
                let mut reviews = txn.open_table(REVIEWS_TABLE).map_err(txn_err)?;
                reviews
                    .insert(id, bytes.as_slice())
                    .map_err(|e| StorageError::Write {
                        reason: e.to_string(),
                    })?;
                saved
            };
            txn.commit().map_err(txn_err)?;
            Ok(saved)
        })
        .await
    }

    async fn get(&self, id: u64) -> Result<Option<ReviewRecord>, StorageError> {
        self.blocking(move |db| {
            let txn = db.begin_read().map_err(txn_err)?;
            let table = txn.open_table(REVIEWS_TABLE).map_err(txn_err)?;
            let value = table.get(id).map_err(|e| StorageError::Read {
                id,
                reason: e.to_string(),
            })?;
            value.map(|v| decode(id, v.value())).transpose()
        })
        .await
    }

    async fn list(
        &self,
        approved_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewRecord>, StorageError> {
        self.blocking(move |db| {
            let list_err = |e: redb::StorageError| StorageError::List {
                reason: e.to_string(),
            };
            let txn = db.begin_read().map_err(txn_err)?;
            let table = txn.open_table(REVIEWS_TABLE).map_err(txn_err)?;
            let mut records = Vec::new();
            for item in table.iter().map_err(list_err)? {
                let (k, v) = item.map_err(list_err)?;
                let record = decode(k.value(), v.value())?;
                if !approved_only || record.approved {
                    records.push(record);
                }
            }
            Ok(newest_first(records, limit))
        })
        .await
    }

    async fn set_approved(
        &self,
        id: u64,
        approved: bool,
    ) -> Result<Option<ReviewRecord>, StorageError> {
        self.blocking(move |db| {
            let txn = db.begin_write().map_err(txn_err)?;
            let updated = {
                let mut table = txn.open_table(REVIEWS_TABLE).map_err(txn_err)?;
                let current = table
                    .get(id)
                    .map_err(|e| StorageError::Read {
                        id,
                        reason: e.to_string(),
                    })?
                    .map(|v| decode(id, v.value()))
                    .transpose()?;
                match current {
                    Some(mut record) => {
                        record.approved = approved;
                        let bytes = encode(&record)?;
                        table
                            .insert(id, bytes.as_slice())
                            .map_err(|e| StorageError::Write {
                                reason: e.to_string(),
                            })?;
                        Some(record)
                    }
                    None => None,
                }
            };
            txn.commit().map_err(txn_err)?;
            Ok(updated)
        })
        .await
    }

    async fn delete(&self, id: u64) -> Result<bool, StorageError> {
        self.blocking(move |db| {
            let txn = db.begin_write().map_err(txn_err)?;
            let removed = {
                let mut table = txn.open_table(REVIEWS_TABLE).map_err(txn_err)?;
                table
                    .remove(id)
                    .map_err(|e| StorageError::Delete {
                        id,
                        reason: e.to_string(),
                    })?
                    .is_some()
            };
            txn.commit().map_err(txn_err)?;
            Ok(removed)
        })
        .await
    }

    fn kind(&self) -> &'static str {
        "redb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(author: &str) -> NewReviewRecord {
        NewReviewRecord {
            author: author.to_owned(),
            company: "СтройМастер".to_owned(),
            role: String::new(),
            text: "Ровная геометрия блоков".to_owned(),
            stars: 5,
        }
    }

    #[tokio::test]
    async fn insert_get_and_moderate() {
        let dir = tempfile::tempdir().unwrap();
        let repo = RedbRepository::open(dir.path().join("reviews.redb")).unwrap();

        let saved = repo.insert(draft("Ivan")).await.unwrap();
        assert_eq!(saved.id, 1);
        assert!(!saved.approved);
        assert_eq!(repo.get(1).await.unwrap(), Some(saved.clone()));

        let approved = repo.set_approved(1, true).await.unwrap().unwrap();
        assert!(approved.approved);
        assert_eq!(approved.text, saved.text);
        assert_eq!(repo.list(true, None).await.unwrap().len(), 1);

        assert!(repo.delete(1).await.unwrap());
        assert!(!repo.delete(1).await.unwrap());
        assert_eq!(repo.get(1).await.unwrap(), None);
        assert_eq!(repo.set_approved(1, true).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reviews.redb");
        {
            let repo = RedbRepository::open(&path).unwrap();
            repo.insert(draft("a")).await.unwrap();
            let b = repo.insert(draft("b")).await.unwrap();
            repo.delete(b.id).await.unwrap();
        }
        let repo = RedbRepository::open(&path).unwrap();
        let c = repo.insert(draft("c")).await.unwrap();
        assert_eq!(c.id, 3);
        assert_eq!(repo.list(false, None).await.unwrap().len(), 2);
    }
}
