//! Silex client surfaces.
//!
//! The three components that talk to the review service, each taking its
//! transport explicitly:
//!
//! - [`submission::SubmissionWidget`] — a visitor rates and submits one review
//! - [`feed::ReviewFeed`] — approved reviews blended with the editorial list
//! - [`panel::AdminPanel`] — password-gated moderation
//!
//! plus [`lead::LeadForm`] for the contact form. All of them go through the
//! [`api::ReviewsApi`] seam; [`api::HttpApi`] is the production transport,
//! resolving URLs from an [`endpoints::Endpoints`] table. Listings decode
//! into the lenient [`review::Review`].

pub mod api;
pub mod endpoints;
pub mod error;
pub mod feed;
pub mod lead;
pub mod panel;
pub mod review;
pub mod submission;

#[cfg(test)]
pub(crate) mod testing;
