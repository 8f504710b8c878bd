//! Transport seam between the client components and the review service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use silex_core::admin::ADMIN_PASSWORD_HEADER;
use silex_core::lead::LeadRequest;
use silex_core::review::{ModerationAction, ModerationOutcome, ReviewDraft};

use crate::endpoints::Endpoints;
use crate::error::ApiError;
use crate::review::Review;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything the client components need from the review service.
#[async_trait]
pub trait ReviewsApi: Send + Sync {
    /// Approved reviews, newest first.
    async fn list_public(&self) -> Result<Vec<Review>, ApiError>;

    /// Submit a review. Returns the assigned id when the server reports one.
    async fn create(&self, draft: &ReviewDraft) -> Result<Option<u64>, ApiError>;

    /// Every review regardless of state. `403` maps to [`ApiError::Forbidden`].
    async fn admin_list(&self, password: &str) -> Result<Vec<Review>, ApiError>;

    /// Apply a moderation action by id. Success is the status code alone;
    /// the resulting state is returned when the server reports it.
    async fn admin_action(
        &self,
        password: &str,
        id: u64,
        action: ModerationAction,
    ) -> Result<Option<ModerationOutcome>, ApiError>;

    /// Send a lead; returns the server's `success` flag.
    async fn send_lead(&self, lead: &LeadRequest) -> Result<bool, ApiError>;
}

#[derive(Deserialize)]
struct ReviewsBody {
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
struct CreateReply {
    id: Option<u64>,
}

#[derive(Serialize)]
struct ModerationBody {
    id: u64,
    action: ModerationAction,
}

#[derive(Deserialize)]
struct ModerationReply {
    state: Option<ModerationOutcome>,
}

#[derive(Deserialize)]
struct LeadReply {
    #[serde(default)]
    success: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// [`ReviewsApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpApi {
    /// Build a client for the given endpoint table.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(endpoints: Endpoints) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http, endpoints })
    }

    /// The endpoint table this client resolves URLs from.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// Send and check the status; returns the body of a success response.
async fn send_checked(request: reqwest::RequestBuilder) -> Result<String, ApiError> {
    let resp = request
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if status == StatusCode::FORBIDDEN {
        return Err(ApiError::Forbidden);
    }
    if !status.is_success() {
        // Prefer the server's human-readable text when it sent one.
        let body = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or(body);
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ApiError> {
    let body = send_checked(request).await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Like [`read_json`], but a success body that does not match `T` is `None`.
async fn read_optional<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<Option<T>, ApiError> {
    let body = send_checked(request).await?;
    Ok(serde_json::from_str(&body).ok())
}

#[async_trait]
impl ReviewsApi for HttpApi {
    async fn list_public(&self) -> Result<Vec<Review>, ApiError> {
        let body: ReviewsBody = read_json(self.http.get(&self.endpoints.reviews)).await?;
        Ok(body.reviews)
    }

    async fn create(&self, draft: &ReviewDraft) -> Result<Option<u64>, ApiError> {
        let reply: Option<CreateReply> =
            read_optional(self.http.post(&self.endpoints.reviews).json(draft)).await?;
        Ok(reply.and_then(|r| r.id))
    }

    async fn admin_list(&self, password: &str) -> Result<Vec<Review>, ApiError> {
        let request = self
            .http
            .get(&self.endpoints.admin_reviews)
            .header(ADMIN_PASSWORD_HEADER, password);
        let body: ReviewsBody = read_json(request).await?;
        Ok(body.reviews)
    }

    async fn admin_action(
        &self,
        password: &str,
        id: u64,
        action: ModerationAction,
    ) -> Result<Option<ModerationOutcome>, ApiError> {
        let request = self
            .http
            .post(&self.endpoints.admin_reviews)
            .header(ADMIN_PASSWORD_HEADER, password)
            .json(&ModerationBody { id, action });
        let reply: Option<ModerationReply> = read_optional(request).await?;
        Ok(reply.and_then(|r| r.state))
    }

    async fn send_lead(&self, lead: &LeadRequest) -> Result<bool, ApiError> {
        let reply: LeadReply =
            read_json(self.http.post(&self.endpoints.send_email).json(lead)).await?;
        Ok(reply.success)
    }
}
