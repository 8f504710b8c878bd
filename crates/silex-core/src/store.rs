//! The review store: the single owner of the review collection.
//!
//! Wraps a [`ReviewRepository`] and enforces intake validation and the
//! moderation transitions before anything is persisted. Clients only ever
//! hold transient copies of what this store returns.

use std::sync::Arc;

use silex_storage::ReviewRepository;
use tracing::{info, warn};

use crate::Review;
use crate::error::ReviewError;
use crate::review::{ModerationAction, ModerationOutcome, ReviewDraft, ReviewState};

/// Review lifecycle operations backed by a repository.
pub struct ReviewStore {
    repo: Arc<dyn ReviewRepository>,
}

impl std::fmt::Debug for ReviewStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewStore")
            .field("backend", &self.repo.kind())
            .finish()
    }
}

impl ReviewStore {
    /// Create a store over the given repository.
    #[must_use]
    pub fn new(repo: Arc<dyn ReviewRepository>) -> Self {
        Self { repo }
    }

    /// Name of the backing repository.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.repo.kind()
    }

    /// Validate and persist a visitor submission.
    ///
    /// The new review is always pending, whatever its content.
    ///
    /// # Errors
    ///
    /// - [`ReviewError::Invalid`] if the draft breaks an intake rule.
    /// - [`ReviewError::Storage`] if the repository fails.
    pub async fn submit(&self, draft: &ReviewDraft) -> Result<Review, ReviewError> {
        let record = draft.validate()?;
        let saved = self.repo.insert(record).await?;

        info!(id = saved.id, stars = saved.stars, "review submitted");

        Ok(saved)
    }

    /// Approved reviews, newest first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] if the repository fails.
    pub async fn list_public(&self, limit: usize) -> Result<Vec<Review>, ReviewError> {
        Ok(self.repo.list(true, Some(limit)).await?)
    }

    /// Every review regardless of state, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] if the repository fails.
    pub async fn list_all(&self) -> Result<Vec<Review>, ReviewError> {
        Ok(self.repo.list(false, None).await?)
    }

    /// Look up a single review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] if the repository fails.
    pub async fn get(&self, id: u64) -> Result<Option<Review>, ReviewError> {
        Ok(self.repo.get(id).await?)
    }

    /// Apply a moderation action to the review with the given id.
    ///
    /// The target state comes from [`ReviewState::apply`]. An approve or
    /// reject that leaves the state unchanged writes nothing. Concurrent
    /// moderators are not coordinated: the last write wins.
    ///
    /// # Errors
    ///
    /// - [`ReviewError::NotFound`] if no review has this id.
    /// - [`ReviewError::Storage`] if the repository fails.
    pub async fn moderate(
        &self,
        id: u64,
        action: ModerationAction,
    ) -> Result<ModerationOutcome, ReviewError> {
        let current = self
            .repo
            .get(id)
            .await?
            .ok_or(ReviewError::NotFound { id })?;
        let before = ReviewState::of(&current);
        let outcome = before.apply(action);

        let Some(target) = outcome.state() else {
            if !self.repo.delete(id).await? {
                warn!(id, "review vanished before delete");
                return Err(ReviewError::NotFound { id });
            }
            info!(id, action = %action, "review deleted");
            return Ok(ModerationOutcome::Deleted);
        };

        if target == before {
            info!(id, action = %action, state = ?target, "moderation left review unchanged");
            return Ok(outcome);
        }

        let updated = self
            .repo
            .set_approved(id, target == ReviewState::Approved)
            .await?
            .ok_or(ReviewError::NotFound { id })?;
        let stored: ModerationOutcome = ReviewState::of(&updated).into();

        info!(id, action = %action, outcome = ?stored, "review moderated");

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silex_storage::MemoryRepository;

    fn make_store() -> ReviewStore {
        ReviewStore::new(Arc::new(MemoryRepository::new()))
    }

    async fn submit(store: &ReviewStore, author: &str) -> Review {
        store
            .submit(&ReviewDraft::new(author, "Great blocks", 5))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn submissions_start_pending() {
        let store = make_store();
        for stars in 1..=5 {
            let review = store
                .submit(&ReviewDraft::new("Ivan", "Great blocks", stars))
                .await
                .unwrap();
            assert!(!review.approved);
        }
        assert!(store.list_public(20).await.unwrap().is_empty());
        assert_eq!(store.list_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn invalid_submission_is_not_stored() {
        let store = make_store();
        let result = store.submit(&ReviewDraft::new("Ivan", "text", 0)).await;
        assert!(matches!(result, Err(ReviewError::Invalid(_))));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn approve_is_idempotent() {
        let store = make_store();
        let review = submit(&store, "Ivan").await;
        assert_eq!(
            store.moderate(review.id, ModerationAction::Approve).await.unwrap(),
            ModerationOutcome::Approved
        );
        assert_eq!(
            store.moderate(review.id, ModerationAction::Approve).await.unwrap(),
            ModerationOutcome::Approved
        );
        assert_eq!(store.list_public(20).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn approve_then_reject_preserves_other_fields() {
        let store = make_store();
        let original = submit(&store, "Ivan").await;
        store.moderate(original.id, ModerationAction::Approve).await.unwrap();
        store.moderate(original.id, ModerationAction::Reject).await.unwrap();

        let after = store.get(original.id).await.unwrap().unwrap();
        assert_eq!(after, original);
    }

    #[tokio::test]
    async fn delete_is_terminal() {
        let store = make_store();
        let review = submit(&store, "Ivan").await;
        store.moderate(review.id, ModerationAction::Approve).await.unwrap();
        assert_eq!(
            store.moderate(review.id, ModerationAction::Delete).await.unwrap(),
            ModerationOutcome::Deleted
        );

        assert!(store.list_all().await.unwrap().iter().all(|r| r.id != review.id));
        assert!(store.list_public(20).await.unwrap().iter().all(|r| r.id != review.id));

        for action in [
            ModerationAction::Approve,
            ModerationAction::Reject,
            ModerationAction::Delete,
        ] {
            let result = store.moderate(review.id, action).await;
            assert!(matches!(result, Err(ReviewError::NotFound { id }) if id == review.id));
        }
    }

    #[tokio::test]
    async fn stored_state_follows_transition_table() {
        let store = make_store();
        for start in [ReviewState::Pending, ReviewState::Approved] {
            for action in [
                ModerationAction::Approve,
                ModerationAction::Reject,
                ModerationAction::Delete,
            ] {
                let review = submit(&store, "Ivan").await;
                if start == ReviewState::Approved {
                    store.moderate(review.id, ModerationAction::Approve).await.unwrap();
                }

                let outcome = store.moderate(review.id, action).await.unwrap();
                assert_eq!(outcome, start.apply(action), "{start:?} + {action}");

                let stored = store.get(review.id).await.unwrap();
                assert_eq!(stored.as_ref().map(ReviewState::of), outcome.state());
            }
        }
    }

    #[tokio::test]
    async fn public_listing_is_capped() {
        let store = make_store();
        for i in 0..25 {
            let review = submit(&store, &format!("author {i}")).await;
            store.moderate(review.id, ModerationAction::Approve).await.unwrap();
        }
        assert_eq!(store.list_public(20).await.unwrap().len(), 20);
        assert_eq!(store.list_all().await.unwrap().len(), 25);
    }
}
