//! A single call in the making.

use std::time::Instant;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use url::Url;

use locafinder_core::logging::targets;

use super::client::HttpClient;
use super::response::HttpResponse;
use crate::error::{NetworkError, Result};

/// A call built by [`HttpClient::get`] or [`HttpClient::post`].
///
/// Nothing is sent until [`HttpCall::send`] is awaited.
#[must_use = "an HttpCall does nothing until sent"]
pub struct HttpCall {
    client: HttpClient,
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Result<Vec<u8>>>,
}

impl HttpCall {
    pub(super) fn new(client: HttpClient, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a query pair. Values are percent-encoded on send.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Send `body` as JSON. An encoding failure surfaces from [`HttpCall::send`].
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body));
        self
    }

    /// Send the call and wait for the status line and headers.
    ///
    /// A non-2xx status is not an error here; see [`HttpResponse::check_status`].
    pub async fn send(self) -> Result<HttpResponse> {
        let body = self
            .body
            .transpose()
            .map_err(|err| NetworkError::Encode(err.to_string()))?;

        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        // Query strings may carry access tokens; only the path is logged.
        let path = url.path().to_owned();

        let mut request = self.client.inner().request(self.method.clone(), url);
        if let Some(bytes) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|err| {
            tracing::warn!(
                target: targets::HTTP,
                method = %self.method,
                %path,
                error = %err,
                "call failed"
            );
            NetworkError::from(err)
        })?;
        tracing::debug!(
            target: targets::HTTP,
            method = %self.method,
            %path,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );
        Ok(HttpResponse::new(response))
    }
}

impl std::fmt::Debug for HttpCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCall")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query_pairs", &self.query.len())
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_reported_on_send() {
        let err = HttpClient::new().get("not a url").send().await.unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_unencodable_body_is_reported_on_send() {
        use std::collections::HashMap;

        // JSON object keys must be strings.
        let body: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let err = HttpClient::new()
            .post("http://localhost/never")
            .json(&body)
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::Encode(_)));
        assert!(!err.is_malformed_response());
    }
}
