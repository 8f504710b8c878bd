//! Endpoint lookup table.
//!
//! Maps the service names `reviews`, `admin-reviews`, and `send-email` to
//! absolute URLs. Built once at startup and handed to the transport; no
//! component reads a global.

use std::collections::HashMap;

use crate::error::EndpointsError;

/// Name of the public reviews endpoint.
pub const REVIEWS: &str = "reviews";
/// Name of the admin reviews endpoint.
pub const ADMIN_REVIEWS: &str = "admin-reviews";
/// Name of the lead capture endpoint.
pub const SEND_EMAIL: &str = "send-email";

/// Resolved URLs for every service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub reviews: String,
    pub admin_reviews: String,
    pub send_email: String,
}

impl Endpoints {
    /// Endpoints served by a Silex server at `base` (e.g. `http://127.0.0.1:8300`).
    #[must_use]
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            reviews: format!("{base}/v1/{REVIEWS}"),
            admin_reviews: format!("{base}/v1/{ADMIN_REVIEWS}"),
            send_email: format!("{base}/v1/{SEND_EMAIL}"),
        }
    }

    /// Parse a `{"reviews": url, "admin-reviews": url, "send-email": url}`
    /// table. Extra entries are ignored.
    ///
    /// # Errors
    ///
    /// - [`EndpointsError::Parse`] if the input is not a JSON string map.
    /// - [`EndpointsError::Missing`] if one of the three names is absent.
    pub fn from_json(json: &str) -> Result<Self, EndpointsError> {
        let mut table: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| EndpointsError::Parse(e.to_string()))?;
        let mut take = |name: &'static str| {
            table
                .remove(name)
                .filter(|url| !url.is_empty())
                .ok_or(EndpointsError::Missing { name })
        };
        Ok(Self {
            reviews: take(REVIEWS)?,
            admin_reviews: take(ADMIN_REVIEWS)?,
            send_email: take(SEND_EMAIL)?,
        })
    }

    /// Look up an endpoint by its service name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            REVIEWS => Some(&self.reviews),
            ADMIN_REVIEWS => Some(&self.admin_reviews),
            SEND_EMAIL => Some(&self.send_email),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_base_strips_trailing_slash() {
        let e = Endpoints::from_base("http://localhost:8300/");
        assert_eq!(e.reviews, "http://localhost:8300/v1/reviews");
        assert_eq!(e.admin_reviews, "http://localhost:8300/v1/admin-reviews");
        assert_eq!(e.send_email, "http://localhost:8300/v1/send-email");
    }

    #[test]
    fn from_json_reads_function_table() {
        let json = r#"{
            "reviews": "https://functions.example/aaa",
            "admin-reviews": "https://functions.example/bbb",
            "send-email": "https://functions.example/ccc",
            "unrelated": "https://functions.example/ddd"
        }"#;
        let e = Endpoints::from_json(json).unwrap();
        assert_eq!(e.get("reviews"), Some("https://functions.example/aaa"));
        assert_eq!(e.get("admin-reviews"), Some("https://functions.example/bbb"));
        assert_eq!(e.get("send-email"), Some("https://functions.example/ccc"));
        assert_eq!(e.get("unrelated"), None);
    }

    #[test]
    fn from_json_reports_missing_entry() {
        let err = Endpoints::from_json(r#"{"reviews": "a", "send-email": "c"}"#).unwrap_err();
        assert!(matches!(err, EndpointsError::Missing { name: "admin-reviews" }));

        let err = Endpoints::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, EndpointsError::Parse(_)));
    }
}
