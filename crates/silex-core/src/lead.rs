//! Lead capture: a visitor's request for a call back.
//!
//! Leads are fire-and-forget. They are validated, rendered into a short
//! notification, and handed to a [`Notifier`]; nothing is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LeadError;

/// Subject line of every lead notification.
pub const LEAD_SUBJECT: &str = "Новая заявка с сайта";

/// A lead as posted by the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// A validated lead, stamped with the time it was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    /// Empty when the visitor left no message.
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl LeadRequest {
    /// Trim fields and require name and phone.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::Missing`] naming the first empty required field.
    pub fn validate(&self, received_at: DateTime<Utc>) -> Result<Lead, LeadError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(LeadError::Missing { field: "name" });
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(LeadError::Missing { field: "phone" });
        }
        Ok(Lead {
            name: name.to_owned(),
            phone: phone.to_owned(),
            message: self.message.trim().to_owned(),
            received_at,
        })
    }
}

impl Lead {
    /// Plain-text notification body.
    #[must_use]
    pub fn render_text(&self) -> String {
        let message = if self.message.is_empty() {
            "не указано"
        } else {
            self.message.as_str()
        };
        format!(
            "{LEAD_SUBJECT}\n\nИмя: {}\nТелефон: {}\nСообщение: {message}\nДата и время: {}\n",
            self.name,
            self.phone,
            self.received_at.format("%d.%m.%Y %H:%M"),
        )
    }
}

/// Delivers leads to whoever handles them.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver one lead.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::Delivery`] if the lead could not be handed off.
    async fn notify(&self, lead: &Lead) -> Result<(), LeadError>;
}

/// Notifier that records leads in the structured log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, lead: &Lead) -> Result<(), LeadError> {
        info!(
            name = %lead.name,
            phone = %lead.phone,
            has_message = !lead.message.is_empty(),
            "lead received"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).single().unwrap()
    }

    #[test]
    fn name_and_phone_are_required() {
        let req = LeadRequest {
            name: " ".to_owned(),
            phone: "+7 900".to_owned(),
            message: String::new(),
        };
        assert!(matches!(req.validate(at()), Err(LeadError::Missing { field: "name" })));

        let req = LeadRequest {
            name: "Ivan".to_owned(),
            ..LeadRequest::default()
        };
        assert!(matches!(req.validate(at()), Err(LeadError::Missing { field: "phone" })));
    }

    #[test]
    fn render_text_fills_missing_message() {
        let lead = LeadRequest {
            name: " Ivan ".to_owned(),
            phone: "+7 900 000-00-00".to_owned(),
            message: "  ".to_owned(),
        }
        .validate(at())
        .unwrap();

        let text = lead.render_text();
        assert!(text.starts_with(LEAD_SUBJECT));
        assert!(text.contains("Имя: Ivan\n"));
        assert!(text.contains("Сообщение: не указано\n"));
        assert!(text.contains("Дата и время: 09.03.2024 14:05"));
    }

    #[tokio::test]
    async fn log_notifier_accepts_leads() {
        let lead = LeadRequest {
            name: "Ivan".to_owned(),
            phone: "123".to_owned(),
            message: "Нужно 40 кубов".to_owned(),
        }
        .validate(at())
        .unwrap();
        LogNotifier.notify(&lead).await.unwrap();
    }
}
