//! Admin review routes: `/v1/admin-reviews`
//!
//! Every request passes the admin password middleware first. Operators see
//! all reviews and apply moderation actions by id.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde::{Deserialize, Serialize};

use silex_core::review::{ModerationAction, ModerationOutcome};

use crate::error::AppError;
use crate::middleware::admin_middleware;
use crate::routes::ReviewsResponse;
use crate::state::AppState;

/// Build the `/v1/admin-reviews` router.
///
/// Paths:
/// - `GET  /v1/admin-reviews` — all reviews, newest first
/// - `POST /v1/admin-reviews` — `{id, action}` with action `approve`, `reject`, or `delete`
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_all).post(moderate))
        .route_layer(middleware::from_fn_with_state(state, admin_middleware))
}

#[derive(Debug, Deserialize)]
pub struct ModerationRequest {
    pub id: Option<u64>,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct ModerationResponse {
    pub ok: bool,
    pub id: u64,
    pub state: ModerationOutcome,
}

async fn list_all(State(state): State<Arc<AppState>>) -> Result<Json<ReviewsResponse>, AppError> {
    let reviews = state.store.list_all().await?;
    Ok(Json(ReviewsResponse { reviews }))
}

async fn moderate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ModerationRequest>, JsonRejection>,
) -> Result<Json<ModerationResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let id = req
        .id
        .ok_or_else(|| AppError::BadRequest("review id is required".to_owned()))?;
    let action: ModerationAction = req.action.parse()?;

    let outcome = state.store.moderate(id, action).await?;

    Ok(Json(ModerationResponse {
        ok: true,
        id,
        state: outcome,
    }))
}
