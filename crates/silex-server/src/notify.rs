//! Webhook lead notifier.
//!
//! Posts each lead as JSON to a configured URL (a mail relay, a chat bot,
//! a CRM intake). Enabled by the `webhook` feature.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use silex_core::error::LeadError;
use silex_core::lead::{LEAD_SUBJECT, Lead, Notifier};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Notifier that forwards leads to an HTTP webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    subject: &'static str,
    text: String,
    #[serde(flatten)]
    lead: &'a Lead,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::Delivery`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, LeadError> {
        let http = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| LeadError::Delivery {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, lead: &Lead) -> Result<(), LeadError> {
        let payload = WebhookPayload {
            subject: LEAD_SUBJECT,
            text: lead.render_text(),
            lead,
        };

        let resp = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LeadError::Delivery {
                reason: format!("webhook request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LeadError::Delivery {
                reason: format!("webhook returned {status}"),
            });
        }

        info!(status = %status, "lead delivered to webhook");
        Ok(())
    }
}
