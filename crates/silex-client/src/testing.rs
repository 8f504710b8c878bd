//! In-memory [`ReviewsApi`] for component tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use silex_core::lead::LeadRequest;
use silex_core::review::{ModerationAction, ModerationOutcome, ReviewDraft, ReviewState};

use crate::api::ReviewsApi;
use crate::error::ApiError;
use crate::review::{CreatedAt, Review};

pub(crate) const PASSWORD: &str = "s3cret";

/// Behaves like the server: admin calls check [`PASSWORD`], listings are
/// newest first, unknown ids answer `404`. With `listing_fails` set the
/// admin listing answers `500`.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub reviews: Mutex<Vec<Review>>,
    pub leads: Mutex<Vec<LeadRequest>>,
    pub create_calls: AtomicUsize,
    pub admin_list_calls: AtomicUsize,
    pub offline: AtomicBool,
    pub listing_fails: AtomicBool,
}

pub(crate) fn review(id: u64, author: &str, approved: bool) -> Review {
    Review {
        id,
        author: author.to_owned(),
        company: String::new(),
        role: String::new(),
        text: format!("review by {author}"),
        stars: 5,
        approved,
        created_at: CreatedAt::Utc(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
                + chrono::Duration::minutes(i64::try_from(id).unwrap()),
        ),
    }
}

impl FakeApi {
    pub fn with_reviews(reviews: Vec<Review>) -> Self {
        Self {
            reviews: Mutex::new(reviews),
            ..Self::default()
        }
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn fail_listing(&self, fail: bool) {
        self.listing_fails.store(fail, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".to_owned()));
        }
        Ok(())
    }

    fn check_password(password: &str) -> Result<(), ApiError> {
        if password == PASSWORD {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    fn sorted(&self, approved_only: bool) -> Vec<Review> {
        let mut out: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !approved_only || r.approved)
            .cloned()
            .collect();
        // Ids grow with insertion time.
        out.sort_by(|a, b| b.id.cmp(&a.id));
        out
    }
}

#[async_trait]
impl ReviewsApi for FakeApi {
    async fn list_public(&self) -> Result<Vec<Review>, ApiError> {
        self.check_online()?;
        Ok(self.sorted(true))
    }

    async fn create(&self, draft: &ReviewDraft) -> Result<Option<u64>, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to run while this one is in flight.
        tokio::task::yield_now().await;
        self.check_online()?;
        let record = draft.validate().map_err(|e| ApiError::Status {
            status: 400,
            body: e.to_string(),
        })?;
        let mut reviews = self.reviews.lock().unwrap();
        let id = reviews.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        reviews.push(Review {
            id,
            author: record.author,
            company: record.company,
            role: record.role,
            text: record.text,
            stars: record.stars,
            approved: false,
            created_at: CreatedAt::Utc(Utc::now()),
        });
        Ok(Some(id))
    }

    async fn admin_list(&self, password: &str) -> Result<Vec<Review>, ApiError> {
        self.admin_list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Self::check_password(password)?;
        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "internal server error".to_owned(),
            });
        }
        Ok(self.sorted(false))
    }

    async fn admin_action(
        &self,
        password: &str,
        id: u64,
        action: ModerationAction,
    ) -> Result<Option<ModerationOutcome>, ApiError> {
        self.check_online()?;
        Self::check_password(password)?;
        let mut reviews = self.reviews.lock().unwrap();
        let Some(pos) = reviews.iter().position(|r| r.id == id) else {
            return Err(ApiError::Status {
                status: 404,
                body: format!("review {id} not found"),
            });
        };
        let outcome = reviews[pos].state().apply(action);
        match outcome.state() {
            Some(target) => reviews[pos].approved = target == ReviewState::Approved,
            None => {
                reviews.remove(pos);
            }
        }
        Ok(Some(outcome))
    }

    async fn send_lead(&self, lead: &LeadRequest) -> Result<bool, ApiError> {
        self.check_online()?;
        self.leads.lock().unwrap().push(lead.clone());
        Ok(true)
    }
}
