//! PostgreSQL review repository.
//!
//! Stores records in a `reviews` table with a `BIGSERIAL` id. Ordering and
//! the approved filter are pushed down into SQL.
//!
//! Feature-gated behind `postgres-backend`. Uses `sqlx` with the Tokio
//! runtime for fully async operations, so no `spawn_blocking` is needed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::{NewReviewRecord, ReviewRecord, ReviewRepository, StorageError};

const COLUMNS: &str = "id, author, company, role, text, stars, approved, created_at";

/// A review repository backed by PostgreSQL.
///
/// Thread-safe via `PgPool` (connection pool).
///
/// # Examples
///
/// ```no_run
/// # use silex_storage::PostgresRepository;
/// # #[tokio::main]
/// # async fn main() {
/// let repo = PostgresRepository::connect("postgres://localhost/silex").await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRepository")
            .field("pool", &"[PgPool]")
            .finish_non_exhaustive()
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    author: String,
    company: Option<String>,
    role: Option<String>,
    text: String,
    stars: i16,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for ReviewRecord {
    type Error = StorageError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let id = u64::try_from(row.id).map_err(|e| StorageError::Corrupt {
            id: 0,
            reason: format!("negative id {}: {e}", row.id),
        })?;
        let stars = u8::try_from(row.stars).map_err(|e| StorageError::Corrupt {
            id,
            reason: format!("stars out of range: {e}"),
        })?;
        Ok(Self {
            id,
            author: row.author,
            company: row.company.unwrap_or_default(),
            role: row.role.unwrap_or_default(),
            text: row.text,
            stars,
            approved: row.approved,
            created_at: row.created_at,
        })
    }
}

fn to_db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

impl PostgresRepository {
    /// Connect to PostgreSQL and run the initial migration.
    ///
    /// Creates the `reviews` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the connection or migration fails.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let open_err = |reason: String| StorageError::Open {
            path: "[database url redacted]".to_owned(),
            reason,
        };

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| open_err(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reviews (\
                id         BIGSERIAL   PRIMARY KEY, \
                author     TEXT        NOT NULL, \
                company    TEXT, \
                role       TEXT, \
                text       TEXT        NOT NULL, \
                stars      SMALLINT    NOT NULL CHECK (stars BETWEEN 1 AND 5), \
                approved   BOOLEAN     NOT NULL DEFAULT FALSE, \
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()\
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| open_err(format!("migration failed: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reviews_approved_created \
             ON reviews (approved, created_at DESC)",
        )
        .execute(&pool)
        .await
        .map_err(|e| open_err(format!("index creation failed: {e}")))?;

        Ok(Self { pool })
    }

    /// Return a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ReviewRepository for PostgresRepository {
    async fn insert(&self, record: NewReviewRecord) -> Result<ReviewRecord, StorageError> {
        let row: ReviewRow = sqlx::query_as(&format!(
            "INSERT INTO reviews (author, company, role, text, stars) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(&record.author)
        .bind(&record.company)
        .bind(&record.role)
        .bind(&record.text)
        .bind(i16::from(record.stars))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Write {
            reason: e.to_string(),
        })?;

        row.try_into()
    }

    async fn get(&self, id: u64) -> Result<Option<ReviewRecord>, StorageError> {
        let Some(db_id) = to_db_id(id) else {
            return Ok(None);
        };
        let row: Option<ReviewRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM reviews WHERE id = $1"))
                .bind(db_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StorageError::Read {
                    id,
                    reason: e.to_string(),
                })?;

        row.map(ReviewRecord::try_from).transpose()
    }

    async fn list(
        &self,
        approved_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewRecord>, StorageError> {
        let limit = limit.and_then(|l| i64::try_from(l).ok());
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM reviews \
             WHERE ($1 = FALSE OR approved = TRUE) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        ))
        .bind(approved_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::List {
            reason: e.to_string(),
        })?;

        rows.into_iter().map(ReviewRecord::try_from).collect()
    }

    async fn set_approved(
        &self,
        id: u64,
        approved: bool,
    ) -> Result<Option<ReviewRecord>, StorageError> {
        let Some(db_id) = to_db_id(id) else {
            return Ok(None);
        };
        let row: Option<ReviewRow> = sqlx::query_as(&format!(
            "UPDATE reviews SET approved = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(db_id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Write {
            reason: e.to_string(),
        })?;

        row.map(ReviewRecord::try_from).transpose()
    }

    async fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let Some(db_id) = to_db_id(id) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(db_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Delete {
                id,
                reason: e.to_string(),
            })?;

        Ok(result.rows_affected() > 0)
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
