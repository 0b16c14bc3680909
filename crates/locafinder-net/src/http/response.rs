//! Responses and status checking.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{NetworkError, Result};

/// Longest error body kept in [`NetworkError::HttpStatus`].
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// A response whose body has not been read yet.
pub struct HttpResponse {
    status: StatusCode,
    inner: reqwest::Response,
}

impl HttpResponse {
    pub(super) fn new(inner: reqwest::Response) -> Self {
        Self {
            status: inner.status(),
            inner,
        }
    }

    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-2xx status into [`NetworkError::HttpStatus`].
    ///
    /// The error body, if any, becomes the message, cut to a readable length.
    pub async fn check_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = self
            .inner
            .text()
            .await
            .ok()
            .map(|text| text.trim().chars().take(MAX_ERROR_MESSAGE_CHARS).collect::<String>())
            .filter(|text| !text.is_empty());
        Err(NetworkError::HttpStatus { status, message })
    }

    /// Read the body as text.
    pub async fn text(self) -> Result<String> {
        Ok(self.inner.text().await?)
    }

    /// Decode the body as JSON.
    ///
    /// The body is read fully first, so invalid JSON is reported as
    /// [`NetworkError::Json`] rather than as a transport failure.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("url", &self.inner.url().as_str())
            .finish()
    }
}
