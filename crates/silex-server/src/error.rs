//! HTTP error types for the Silex server.
//!
//! Maps domain errors from `silex-core` into HTTP responses. Every error
//! produces a JSON body with a machine-readable `error` field and a
//! human-readable `message` shown to visitors as-is.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use silex_core::error::{LeadError, ReviewError};

/// Message shown when a review submission is incomplete.
pub const REVIEW_INCOMPLETE_MESSAGE: &str = "Заполните все обязательные поля";
/// Message shown when a lead lacks name or phone.
pub const LEAD_INCOMPLETE_MESSAGE: &str = "Имя и телефон обязательны";
/// Message returned for a wrong admin password.
pub const FORBIDDEN_MESSAGE: &str = "Нет доступа";

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Admin password missing or wrong.
    Forbidden,
    /// Requested resource not found.
    NotFound(String),
    /// Client sent invalid input.
    BadRequest(String),
    /// A downstream service (lead notifier) failed.
    BadGateway(String),
    /// Internal server error.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                FORBIDDEN_MESSAGE.to_owned(),
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "notification_failed", msg),
            Self::Internal(msg) => {
                error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_owned(),
                )
            }
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Invalid(_) => Self::BadRequest(REVIEW_INCOMPLETE_MESSAGE.to_owned()),
            ReviewError::UnknownAction { .. } => Self::BadRequest(err.to_string()),
            ReviewError::NotFound { .. } => Self::NotFound(err.to_string()),
            ReviewError::Storage(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<LeadError> for AppError {
    fn from(err: LeadError) -> Self {
        match err {
            LeadError::Missing { .. } => Self::BadRequest(LEAD_INCOMPLETE_MESSAGE.to_owned()),
            LeadError::Delivery { .. } => Self::BadGateway(err.to_string()),
        }
    }
}
