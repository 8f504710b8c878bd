//! Shared application state for the Silex server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::sync::Arc;

use silex_core::admin::AdminGate;
use silex_core::lead::Notifier;
use silex_core::store::ReviewStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Review lifecycle over the configured repository.
    pub store: ReviewStore,
    /// Admin password check.
    pub gate: AdminGate,
    /// Lead delivery.
    pub notifier: Arc<dyn Notifier>,
    /// Cap on the public review listing.
    pub public_limit: usize,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("gate", &self.gate)
            .field("public_limit", &self.public_limit)
            .finish_non_exhaustive()
    }
}
