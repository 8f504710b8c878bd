//! HTTP route handlers for Silex.
//!
//! Routes are organized by surface:
//! - `reviews`: public listing and submission
//! - `admin`: password-gated listing and moderation
//! - `leads`: contact form delivery
//! - `sys`: health

pub mod admin;
pub mod leads;
pub mod reviews;
pub mod sys;

use serde::{Deserialize, Serialize};

use silex_core::Review;

/// Body of every review listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
}
