//! Remote endpoint configuration.

use serde::{Deserialize, Serialize};

const WEBHOOK_BASE: &str = "https://glorytran.app.n8n.cloud/webhook";

/// URLs of the automation webhooks backing the product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookEndpoints {
    /// Point source (`GET`).
    pub points: String,
    /// Viewing booking (`POST`).
    pub booking: String,
    /// Price prediction (`POST`).
    pub predict: String,
    /// Two-point comparison (`POST`).
    pub compare: String,
    /// Chat assistant (`POST`).
    pub chat: String,
}

impl Default for WebhookEndpoints {
    fn default() -> Self {
        Self::with_base(WEBHOOK_BASE)
    }
}

impl WebhookEndpoints {
    /// Derive every endpoint from a common base URL.
    ///
    /// ```
    /// use locafinder_net::WebhookEndpoints;
    ///
    /// let endpoints = WebhookEndpoints::with_base("http://localhost:5678/webhook/");
    /// assert_eq!(endpoints.predict, "http://localhost:5678/webhook/predict");
    /// ```
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            points: format!("{base}/locafinder"),
            booking: format!("{base}/booking"),
            predict: format!("{base}/predict"),
            compare: format!("{base}/compare"),
            chat: format!("{base}/aichat"),
        }
    }
}

/// Directions service location and credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsEndpoint {
    /// Base URL up to, but not including, the routing profile.
    pub base_url: String,
    /// Routing profile (`driving`, `walking`, `cycling`).
    pub profile: String,
    /// Access token appended to every request.
    pub access_token: Option<String>,
}

impl Default for DirectionsEndpoint {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapbox.com/directions/v5/mapbox".to_string(),
            profile: "driving".to_string(),
            access_token: None,
        }
    }
}

impl std::fmt::Debug for DirectionsEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionsEndpoint")
            .field("base_url", &self.base_url)
            .field("profile", &self.profile)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_webhooks() {
        let endpoints = WebhookEndpoints::default();
        assert_eq!(endpoints.points, "https://glorytran.app.n8n.cloud/webhook/locafinder");
        assert_eq!(endpoints.chat, "https://glorytran.app.n8n.cloud/webhook/aichat");
    }

    #[test]
    fn test_token_is_redacted() {
        let endpoint = DirectionsEndpoint {
            access_token: Some("pk.secret".into()),
            ..Default::default()
        };
        assert!(!format!("{endpoint:?}").contains("pk.secret"));
    }
}
