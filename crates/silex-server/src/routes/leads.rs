//! Lead capture route: `/v1/send-email`

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use silex_core::lead::LeadRequest;

use crate::error::{AppError, LEAD_INCOMPLETE_MESSAGE};
use crate::state::AppState;

/// Build the `/v1/send-email` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(send_lead))
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub success: bool,
}

async fn send_lead(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LeadRequest>, JsonRejection>,
) -> Result<Json<LeadResponse>, AppError> {
    let Json(req) =
        body.map_err(|_| AppError::BadRequest(LEAD_INCOMPLETE_MESSAGE.to_owned()))?;

    let lead = req.validate(Utc::now())?;
    state.notifier.notify(&lead).await?;

    Ok(Json(LeadResponse { success: true }))
}
