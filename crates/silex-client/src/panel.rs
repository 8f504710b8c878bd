//! Admin moderation panel.
//!
//! Locked until the operator enters the admin password. The password is
//! checked by the server (an authenticated list call) and then held in
//! memory for the rest of the session; it is never written anywhere.
//! Only a `403` means "wrong password": any other answer unlocks the
//! panel, even one whose list could not be read.
//!
//! After every moderation action the panel reloads the full review set
//! rather than patching its local copy, so what it shows is always what
//! the server has.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use silex_core::review::{ModerationAction, ModerationOutcome, ReviewState};

use crate::api::ReviewsApi;
use crate::error::{ApiError, PanelError};
use crate::review::Review;

/// Shown when the server rejects the password.
pub const WRONG_PASSWORD_MESSAGE: &str = "Неверный пароль";
/// Shown when the server cannot be reached.
pub const UNAVAILABLE_MESSAGE: &str = "Сервер недоступен";

/// Credentials for the current panel session.
#[derive(Clone)]
pub struct AdminSession {
    password: String,
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum PanelView {
    Locked {
        error: Option<&'static str>,
    },
    Unlocked {
        session: AdminSession,
        reviews: Vec<Review>,
        /// Why the last load failed; `reviews` is then stale or empty.
        load_error: Option<String>,
    },
}

/// Result of one moderation action.
///
/// `error` carries the failure of the mutation itself. `reload_error` is
/// set when the reload that follows every action failed, so the list on
/// screen may be stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub id: u64,
    pub action: ModerationAction,
    pub outcome: Option<ModerationOutcome>,
    pub error: Option<String>,
    pub reload_error: Option<String>,
}

impl ActionReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub struct AdminPanel {
    api: Arc<dyn ReviewsApi>,
    view: PanelView,
}

impl fmt::Debug for AdminPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminPanel")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl AdminPanel {
    #[must_use]
    pub fn new(api: Arc<dyn ReviewsApi>) -> Self {
        Self {
            api,
            view: PanelView::Locked { error: None },
        }
    }

    #[must_use]
    pub fn view(&self) -> &PanelView {
        &self.view
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        matches!(self.view, PanelView::Unlocked { .. })
    }

    /// Message shown on the login screen, if any.
    #[must_use]
    pub fn error(&self) -> Option<&'static str> {
        match self.view {
            PanelView::Locked { error } => error,
            PanelView::Unlocked { .. } => None,
        }
    }

    /// Why the review list could not be loaded, while unlocked.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        match &self.view {
            PanelView::Locked { .. } => None,
            PanelView::Unlocked { load_error, .. } => load_error.as_deref(),
        }
    }

    /// All loaded reviews, newest first. Empty while locked.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        match &self.view {
            PanelView::Locked { .. } => &[],
            PanelView::Unlocked { reviews, .. } => reviews,
        }
    }

    /// Reviews awaiting moderation, in store order.
    #[must_use]
    pub fn pending(&self) -> Vec<&Review> {
        self.in_state(ReviewState::Pending)
    }

    /// Reviews visible to the public, in store order.
    #[must_use]
    pub fn approved(&self) -> Vec<&Review> {
        self.in_state(ReviewState::Approved)
    }

    fn in_state(&self, state: ReviewState) -> Vec<&Review> {
        self.reviews()
            .iter()
            .filter(|r| r.state() == state)
            .collect()
    }

    /// Unlock the panel with `password`.
    ///
    /// A `403` keeps the panel locked. Any other response unlocks it; if
    /// the list could not be read the panel starts empty with
    /// [`load_error`](Self::load_error) set.
    ///
    /// # Errors
    ///
    /// - [`PanelError::WrongPassword`] if the server answers `403`.
    /// - [`PanelError::Unavailable`] if no response arrived at all; the
    ///   panel stays locked showing [`UNAVAILABLE_MESSAGE`].
    pub async fn login(&mut self, password: &str) -> Result<(), PanelError> {
        let (reviews, load_error) = match self.api.admin_list(password).await {
            Ok(reviews) => (reviews, None),
            Err(ApiError::Forbidden) => {
                self.view = PanelView::Locked {
                    error: Some(WRONG_PASSWORD_MESSAGE),
                };
                return Err(PanelError::WrongPassword);
            }
            Err(e @ ApiError::Transport(_)) => {
                warn!(error = %e, "admin login failed");
                self.view = PanelView::Locked {
                    error: Some(UNAVAILABLE_MESSAGE),
                };
                return Err(PanelError::Unavailable(e));
            }
            Err(e) => {
                warn!(error = %e, "admin review list unreadable, unlocking with an empty list");
                (Vec::new(), Some(describe(&e)))
            }
        };

        info!(count = reviews.len(), "admin panel unlocked");
        self.view = PanelView::Unlocked {
            session: AdminSession {
                password: password.to_owned(),
            },
            reviews,
            load_error,
        };
        Ok(())
    }

    /// Forget the password and lock the panel.
    pub fn logout(&mut self) {
        self.view = PanelView::Locked { error: None };
    }

    fn session(&self) -> Result<AdminSession, PanelError> {
        match &self.view {
            PanelView::Unlocked { session, .. } => Ok(session.clone()),
            PanelView::Locked { .. } => Err(PanelError::NotAuthenticated),
        }
    }

    /// Reload every review with the session password.
    ///
    /// A `403` locks the panel. Other failures keep the current list and
    /// set [`load_error`](Self::load_error).
    ///
    /// # Errors
    ///
    /// - [`PanelError::NotAuthenticated`] while locked.
    /// - [`PanelError::WrongPassword`] on `403`.
    /// - [`PanelError::Unavailable`] on any other failure.
    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        let session = self.session()?;
        let result = self.api.admin_list(&session.password).await;

        if let Err(ApiError::Forbidden) = result {
            warn!("admin password no longer accepted, locking panel");
            self.view = PanelView::Locked {
                error: Some(WRONG_PASSWORD_MESSAGE),
            };
            return Err(PanelError::WrongPassword);
        }

        let PanelView::Unlocked {
            reviews,
            load_error,
            ..
        } = &mut self.view
        else {
            return Err(PanelError::NotAuthenticated);
        };
        match result {
            Ok(fresh) => {
                *reviews = fresh;
                *load_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "admin review reload failed");
                *load_error = Some(describe(&e));
                Err(PanelError::Unavailable(e))
            }
        }
    }

    /// Apply `action` to review `id`, then reload.
    ///
    /// The reload happens whether or not the mutation succeeded. A failed
    /// mutation is reported in [`ActionReport::error`], a failed reload in
    /// [`ActionReport::reload_error`]; a `403` on reload locks the panel.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotAuthenticated`] while locked. Nothing is sent.
    pub async fn perform_action(
        &mut self,
        id: u64,
        action: ModerationAction,
    ) -> Result<ActionReport, PanelError> {
        let session = self.session()?;

        let (outcome, error) = match self.api.admin_action(&session.password, id, action).await {
            Ok(outcome) => {
                info!(id, %action, ?outcome, "moderation action applied");
                (outcome, None)
            }
            Err(e) => {
                warn!(id, %action, error = %e, "moderation action failed");
                (None, Some(describe(&e)))
            }
        };

        let reload_error = match self.refresh().await {
            Ok(()) => None,
            Err(PanelError::Unavailable(e)) => Some(describe(&e)),
            Err(PanelError::WrongPassword) => Some(WRONG_PASSWORD_MESSAGE.to_owned()),
            Err(e @ PanelError::NotAuthenticated) => Some(e.to_string()),
        };

        Ok(ActionReport {
            id,
            action,
            outcome,
            error,
            reload_error,
        })
    }
}

fn describe(error: &ApiError) -> String {
    match error {
        ApiError::Forbidden => WRONG_PASSWORD_MESSAGE.to_owned(),
        ApiError::Status { body, .. } => body.clone(),
        ApiError::Transport(_) | ApiError::Decode(_) => UNAVAILABLE_MESSAGE.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testing::{FakeApi, PASSWORD, review};

    fn seeded() -> Arc<FakeApi> {
        Arc::new(FakeApi::with_reviews(vec![
            review(1, "Олег", false),
            review(2, "Анна", true),
            review(3, "Пётр", false),
        ]))
    }

    async fn unlocked(api: &Arc<FakeApi>) -> AdminPanel {
        let mut panel = AdminPanel::new(Arc::clone(api) as Arc<dyn ReviewsApi>);
        panel.login(PASSWORD).await.unwrap();
        panel
    }

    #[tokio::test]
    async fn wrong_password_stays_locked_without_data() {
        let api = seeded();
        let mut panel = AdminPanel::new(Arc::clone(&api) as Arc<dyn ReviewsApi>);

        let err = panel.login("guess").await.unwrap_err();
        assert!(matches!(err, PanelError::WrongPassword));
        assert!(!panel.is_unlocked());
        assert_eq!(panel.error(), Some(WRONG_PASSWORD_MESSAGE));
        assert!(panel.reviews().is_empty());
        assert!(panel.pending().is_empty());
    }

    #[tokio::test]
    async fn unreachable_server_reports_unavailable() {
        let api = seeded();
        api.go_offline();
        let mut panel = AdminPanel::new(Arc::clone(&api) as Arc<dyn ReviewsApi>);

        let err = panel.login(PASSWORD).await.unwrap_err();
        assert!(matches!(err, PanelError::Unavailable(_)));
        assert_eq!(panel.error(), Some(UNAVAILABLE_MESSAGE));
    }

    #[tokio::test]
    async fn server_error_on_login_unlocks_with_empty_list() {
        let api = seeded();
        api.fail_listing(true);
        let mut panel = AdminPanel::new(Arc::clone(&api) as Arc<dyn ReviewsApi>);

        panel.login(PASSWORD).await.unwrap();
        assert!(panel.is_unlocked());
        assert!(panel.reviews().is_empty());
        assert_eq!(panel.error(), None);
        assert_eq!(panel.load_error(), Some("internal server error"));

        api.fail_listing(false);
        panel.refresh().await.unwrap();
        assert_eq!(panel.reviews().len(), 3);
        assert_eq!(panel.load_error(), None);
    }

    #[tokio::test]
    async fn login_partitions_reviews() {
        let api = seeded();
        let panel = unlocked(&api).await;

        let pending: Vec<u64> = panel.pending().iter().map(|r| r.id).collect();
        let approved: Vec<u64> = panel.approved().iter().map(|r| r.id).collect();
        assert_eq!(pending, vec![3, 1]);
        assert_eq!(approved, vec![2]);
        assert_eq!(panel.error(), None);
    }

    #[tokio::test]
    async fn action_reloads_from_server() {
        let api = seeded();
        let mut panel = unlocked(&api).await;
        let loads_before = api.admin_list_calls.load(Ordering::SeqCst);

        let report = panel
            .perform_action(1, ModerationAction::Approve)
            .await
            .unwrap();
        assert!(report.is_ok());
        assert_eq!(report.outcome, Some(ModerationOutcome::Approved));
        assert_eq!(report.reload_error, None);
        assert_eq!(api.admin_list_calls.load(Ordering::SeqCst), loads_before + 1);

        let approved: Vec<u64> = panel.approved().iter().map(|r| r.id).collect();
        assert_eq!(approved, vec![2, 1]);

        panel
            .perform_action(2, ModerationAction::Delete)
            .await
            .unwrap();
        assert!(panel.reviews().iter().all(|r| r.id != 2));
    }

    #[tokio::test]
    async fn failed_action_is_reported_and_still_reloads() {
        let api = seeded();
        let mut panel = unlocked(&api).await;
        let loads_before = api.admin_list_calls.load(Ordering::SeqCst);

        let report = panel
            .perform_action(99, ModerationAction::Approve)
            .await
            .unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.outcome, None);
        assert!(report.error.as_deref().unwrap().contains("99"));
        assert_eq!(report.reload_error, None);
        assert_eq!(api.admin_list_calls.load(Ordering::SeqCst), loads_before + 1);
        assert!(panel.is_unlocked());
    }

    #[tokio::test]
    async fn failed_reload_after_action_is_reported() {
        let api = seeded();
        let mut panel = unlocked(&api).await;
        api.fail_listing(true);

        let report = panel
            .perform_action(1, ModerationAction::Approve)
            .await
            .unwrap();
        assert!(report.is_ok());
        assert_eq!(report.reload_error.as_deref(), Some("internal server error"));
        assert_eq!(panel.load_error(), Some("internal server error"));
        assert!(panel.is_unlocked());
        // The list on screen predates the approval.
        assert_eq!(panel.pending().len(), 2);
        assert!(api.reviews.lock().unwrap()[0].approved);
    }

    #[tokio::test]
    async fn locked_panel_refuses_actions() {
        let api = seeded();
        let mut panel = AdminPanel::new(Arc::clone(&api) as Arc<dyn ReviewsApi>);

        let err = panel
            .perform_action(1, ModerationAction::Approve)
            .await
            .unwrap_err();
        assert!(matches!(err, PanelError::NotAuthenticated));
        assert!(!api.reviews.lock().unwrap()[0].approved);
    }

    #[tokio::test]
    async fn logout_forgets_session() {
        let api = seeded();
        let mut panel = unlocked(&api).await;
        panel.logout();

        assert!(!panel.is_unlocked());
        assert!(panel.reviews().is_empty());
        assert_eq!(panel.error(), None);
    }
}
