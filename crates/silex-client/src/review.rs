//! Reviews as the client receives them.
//!
//! Read leniently: optional fields may be missing or `null`, and
//! `created_at` may be RFC 3339 or a preformatted display string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use silex_core::review::ReviewState;

/// Display format for timestamps.
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// When a review was written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    Utc(DateTime<Utc>),
    /// Anything else the server sent, shown as-is.
    Text(String),
}

impl Default for CreatedAt {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl CreatedAt {
    /// Text for the moderation card.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Utc(at) => at.format(DISPLAY_FORMAT).to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A review listed by the public or admin endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Review {
    pub id: u64,
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    pub text: String,
    pub stars: u8,
    /// The public endpoint only lists approved reviews and may omit this.
    #[serde(default = "approved_by_default")]
    pub approved: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: CreatedAt,
}

fn approved_by_default() -> bool {
    true
}

impl Review {
    #[must_use]
    pub fn state(&self) -> ReviewState {
        ReviewState::from_approved(self.approved)
    }
}
