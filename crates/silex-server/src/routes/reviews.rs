//! Public review routes: `/v1/reviews`
//!
//! Visitors read approved reviews and submit new ones. Nothing submitted
//! here is visible until an operator approves it.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use silex_core::review::ReviewDraft;

use crate::error::{AppError, REVIEW_INCOMPLETE_MESSAGE};
use crate::routes::ReviewsResponse;
use crate::state::AppState;

/// Build the `/v1/reviews` router.
///
/// Paths:
/// - `GET  /v1/reviews` — approved reviews, newest first
/// - `POST /v1/reviews` — submit a review (starts pending)
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_reviews).post(create_review))
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub ok: bool,
    pub id: u64,
}

/// List approved reviews only; pending text never leaves the server here.
async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReviewsResponse>, AppError> {
    let reviews = state.store.list_public(state.public_limit).await?;
    Ok(Json(ReviewsResponse { reviews }))
}

async fn create_review(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ReviewDraft>, JsonRejection>,
) -> Result<Json<CreateResponse>, AppError> {
    let Json(draft) = body.map_err(|e| {
        debug!(error = %e, "rejected review body");
        AppError::BadRequest(REVIEW_INCOMPLETE_MESSAGE.to_owned())
    })?;

    let review = state.store.submit(&draft).await?;

    Ok(Json(CreateResponse {
        ok: true,
        id: review.id,
    }))
}
