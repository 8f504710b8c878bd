//! Admin password middleware.
//!
//! Checks the `x-admin-password` header on every admin route before the
//! handler runs. A missing or wrong password never reaches the store; the
//! caller gets `403` and no review data.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use silex_core::admin::ADMIN_PASSWORD_HEADER;

use crate::error::AppError;
use crate::state::AppState;

/// Middleware that validates the `x-admin-password` header.
///
/// `OPTIONS` preflights pass through so browsers can discover CORS rules.
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if req.method() == axum::http::Method::OPTIONS {
        return next.run(req).await;
    }

    let password = req
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if state.gate.verify(password) {
        next.run(req).await
    } else {
        warn!(
            path = %req.uri().path(),
            header_present = req.headers().contains_key(ADMIN_PASSWORD_HEADER),
            "admin access denied"
        );
        AppError::Forbidden.into_response()
    }
}
