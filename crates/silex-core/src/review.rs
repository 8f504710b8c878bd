//! Review intake and the moderation state machine.
//!
//! A review is created pending and moves between two live states until it
//! is deleted:
//!
//! ```text
//!            approve
//!   Pending ─────────▶ Approved
//!      ▲                  │
//!      └──────────────────┘
//!             reject
//!
//!   Pending | Approved ──delete──▶ Deleted (terminal, record removed)
//! ```
//!
//! `approve` on an approved review and `reject` on a pending one are no-ops.
//! Only the `approved` flag ever changes; every other field is fixed at
//! creation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use silex_storage::NewReviewRecord;

use crate::Review;
use crate::error::{ReviewError, ValidationError};

/// Maximum length of `author`, `company`, and `role`, in characters.
pub const MAX_NAME_CHARS: usize = 120;
/// Maximum length of the review body, in characters.
pub const MAX_TEXT_CHARS: usize = 4000;
/// Lowest accepted star rating.
pub const MIN_STARS: i64 = 1;
/// Highest accepted star rating.
pub const MAX_STARS: i64 = 5;

/// An unvalidated review as submitted by a visitor.
///
/// Missing fields deserialize to their empty value so that validation, not
/// the JSON decoder, decides what is acceptable. `stars = 0` means "no
/// rating chosen".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub stars: i64,
}

impl ReviewDraft {
    /// Draft with the three fields the public form collects.
    #[must_use]
    pub fn new(author: impl Into<String>, text: impl Into<String>, stars: i64) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            stars,
            ..Self::default()
        }
    }

    /// Check every intake rule and produce the record to persist.
    ///
    /// Text fields are trimmed; `company` and `role` default to empty.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking `stars`,
    /// then `author`, then `text`, then the optional fields.
    pub fn validate(&self) -> Result<NewReviewRecord, ValidationError> {
        let stars = valid_stars(self.stars)?;
        let author = required("author", &self.author, MAX_NAME_CHARS)?;
        let text = required("text", &self.text, MAX_TEXT_CHARS)?;
        let company = bounded("company", &self.company, MAX_NAME_CHARS)?;
        let role = bounded("role", &self.role, MAX_NAME_CHARS)?;

        Ok(NewReviewRecord {
            author,
            company,
            role,
            text,
            stars,
        })
    }

    /// Whether [`validate`](Self::validate) would succeed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

fn valid_stars(stars: i64) -> Result<u8, ValidationError> {
    if (MIN_STARS..=MAX_STARS).contains(&stars) {
        u8::try_from(stars).map_err(|_| ValidationError::Stars { stars })
    } else {
        Err(ValidationError::Stars { stars })
    }
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

fn required(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = bounded(field, value, max)?;
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    Ok(trimmed)
}

/// Live moderation state of a review that exists in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewState {
    /// Exists, not visible to the public.
    Pending,
    /// Exists and visible to the public.
    Approved,
}

impl ReviewState {
    /// State of a stored review.
    #[must_use]
    pub fn of(review: &Review) -> Self {
        Self::from_approved(review.approved)
    }

    /// State matching a stored `approved` flag.
    #[must_use]
    pub fn from_approved(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Pending
        }
    }

    /// Where `action` takes a review in this state.
    ///
    /// Approve and reject land in the same state from either side, so
    /// repeating one is a no-op rather than an error.
    #[must_use]
    pub fn apply(self, action: ModerationAction) -> ModerationOutcome {
        match (self, action) {
            (_, ModerationAction::Delete) => ModerationOutcome::Deleted,
            (Self::Pending | Self::Approved, ModerationAction::Approve) => {
                ModerationOutcome::Approved
            }
            (Self::Pending | Self::Approved, ModerationAction::Reject) => {
                ModerationOutcome::Pending
            }
        }
    }

    /// Actions an operator is offered for a review in this state.
    ///
    /// The no-op transitions are accepted by the store but never offered.
    #[must_use]
    pub fn available_actions(self) -> &'static [ModerationAction] {
        match self {
            Self::Pending => &[ModerationAction::Approve, ModerationAction::Delete],
            Self::Approved => &[ModerationAction::Reject, ModerationAction::Delete],
        }
    }
}

/// An operator action applied to a review by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    /// Make the review public.
    Approve,
    /// Return the review to pending without deleting it.
    Reject,
    /// Remove the review permanently.
    Delete,
}

impl ModerationAction {
    /// Wire name of the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationAction {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "delete" => Ok(Self::Delete),
            other => Err(ReviewError::UnknownAction {
                action: other.to_owned(),
            }),
        }
    }
}

/// State of a review after a moderation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationOutcome {
    Pending,
    Approved,
    /// Terminal: the record no longer exists.
    Deleted,
}

impl ModerationOutcome {
    /// The live state this outcome leaves the review in; `None` once deleted.
    #[must_use]
    pub fn state(self) -> Option<ReviewState> {
        match self {
            Self::Pending => Some(ReviewState::Pending),
            Self::Approved => Some(ReviewState::Approved),
            Self::Deleted => None,
        }
    }
}

impl From<ReviewState> for ModerationOutcome {
    fn from(state: ReviewState) -> Self {
        match state {
            ReviewState::Pending => Self::Pending,
            ReviewState::Approved => Self::Approved,
        }
    }
}
