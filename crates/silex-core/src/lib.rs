//! Core library for the Silex review service.
//!
//! Provides the review data model and intake validation, the moderation
//! state machine, the [`store::ReviewStore`] service layered over a
//! [`silex_storage::ReviewRepository`], the shared-secret admin gate, and
//! lead-capture validation with its notification seam.

pub mod admin;
pub mod error;
pub mod lead;
pub mod review;
pub mod store;

pub use silex_storage::ReviewRecord as Review;
