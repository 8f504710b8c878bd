//! Review record types as they are persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted review.
///
/// This is also the JSON shape exchanged over HTTP:
/// `id, author, company, role, text, stars, approved, created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: u64,
    pub author: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    pub text: String,
    pub stars: u8,
    #[serde(default)]
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when inserting a review.
///
/// The repository assigns `id` and `created_at` and always starts the
/// record unapproved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewRecord {
    pub author: String,
    pub company: String,
    pub role: String,
    pub text: String,
    pub stars: u8,
}

impl NewReviewRecord {
    /// Attach the store-assigned identity to produce a full record.
    pub(crate) fn into_record(self, id: u64, created_at: DateTime<Utc>) -> ReviewRecord {
        ReviewRecord {
            id,
            author: self.author,
            company: self.company,
            role: self.role,
            text: self.text,
            stars: self.stars,
            approved: false,
            created_at,
        }
    }
}
