//! Silex HTTP server.
//!
//! Wires together the review store, admin gate, and lead notifier into an
//! Axum application serving the JSON API under `/v1`.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
#[cfg(feature = "webhook")]
pub mod notify;
pub mod routes;
pub mod state;
