//! Contact form: name, phone, optional message.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use silex_core::lead::LeadRequest;

use crate::api::ReviewsApi;

/// Shown after the lead was delivered.
pub const SENT_MESSAGE: &str = "Заявка отправлена! Мы свяжемся с вами в течение 15 минут.";
/// Shown when name or phone is missing.
pub const INCOMPLETE_MESSAGE: &str = "Имя и телефон обязательны";
/// Shown when the request failed.
pub const FAILED_MESSAGE: &str = "Не удалось отправить заявку. Позвоните нам.";

/// What the form shows after [`LeadForm::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadOutcome {
    pub ok: bool,
    pub message: &'static str,
}

#[derive(Clone)]
pub struct LeadForm {
    api: Arc<dyn ReviewsApi>,
}

impl LeadForm {
    #[must_use]
    pub fn new(api: Arc<dyn ReviewsApi>) -> Self {
        Self { api }
    }

    /// Validate locally, then send. Incomplete forms never reach the network.
    pub async fn send(&self, name: &str, phone: &str, message: &str) -> LeadOutcome {
        let request = LeadRequest {
            name: name.to_owned(),
            phone: phone.to_owned(),
            message: message.to_owned(),
        };
        if request.validate(Utc::now()).is_err() {
            return LeadOutcome {
                ok: false,
                message: INCOMPLETE_MESSAGE,
            };
        }

        match self.api.send_lead(&request).await {
            Ok(true) => LeadOutcome {
                ok: true,
                message: SENT_MESSAGE,
            },
            Ok(false) => {
                warn!("lead endpoint answered without success");
                LeadOutcome {
                    ok: false,
                    message: FAILED_MESSAGE,
                }
            }
            Err(e) => {
                warn!(error = %e, "lead delivery failed");
                LeadOutcome {
                    ok: false,
                    message: FAILED_MESSAGE,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    #[tokio::test]
    async fn complete_lead_is_sent() {
        let api = Arc::new(FakeApi::default());
        let form = LeadForm::new(Arc::clone(&api) as Arc<dyn ReviewsApi>);

        let outcome = form.send("Анна", "+7 900 000-00-00", "").await;
        assert!(outcome.ok);
        assert_eq!(outcome.message, SENT_MESSAGE);
        assert_eq!(api.leads.lock().unwrap()[0].name, "Анна");
    }

    #[tokio::test]
    async fn missing_phone_never_leaves_the_form() {
        let api = Arc::new(FakeApi::default());
        let form = LeadForm::new(Arc::clone(&api) as Arc<dyn ReviewsApi>);

        let outcome = form.send("Анна", "  ", "перезвоните").await;
        assert_eq!(
            outcome,
            LeadOutcome {
                ok: false,
                message: INCOMPLETE_MESSAGE
            }
        );
        assert!(api.leads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_reported() {
        let api = Arc::new(FakeApi::default());
        api.go_offline();
        let form = LeadForm::new(api);

        let outcome = form.send("Анна", "+7 900 000-00-00", "").await;
        assert!(!outcome.ok);
        assert_eq!(outcome.message, FAILED_MESSAGE);
    }
}
