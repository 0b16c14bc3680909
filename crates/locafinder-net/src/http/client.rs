//! The shared client and its builder.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;

use super::call::HttpCall;
use crate::error::Result;

/// Redirect hops followed before a call fails.
const MAX_REDIRECTS: usize = 5;

/// Settings applied to every call made through one [`HttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpOptions {
    /// Whole-call timeout. `None` waits for as long as the server does.
    pub timeout: Option<Duration>,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            user_agent: Some(format!("locafinder/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Builder for an [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    options: HttpOptions,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail calls that take longer than `timeout` in total.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.options.timeout = None;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client. Fails only if the TLS backend cannot start.
    pub fn build(self) -> Result<HttpClient> {
        let options = self.options;
        let mut builder = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &options.user_agent {
            builder = builder.user_agent(agent.as_str());
        }

        Ok(HttpClient {
            inner: builder.build()?,
            options: Arc::new(options),
        })
    }
}

/// Client shared by all remote collaborators.
///
/// Cloning is cheap: clones share one connection pool and one set of
/// [`HttpOptions`].
///
/// ```ignore
/// use locafinder_net::HttpClient;
///
/// let http = HttpClient::new();
/// let rows: serde_json::Value = http
///     .get("https://automation.example/webhook/locafinder")
///     .send()
///     .await?
///     .check_status()
///     .await?
///     .json()
///     .await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    options: Arc<HttpOptions>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a client with [`HttpOptions::default`].
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot start. [`HttpClient::builder`]
    /// reports that case as an error instead.
    pub fn new() -> Self {
        HttpClientBuilder::new()
            .build()
            .expect("default HTTP client options are valid")
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// The options this client was built with.
    pub fn options(&self) -> &HttpOptions {
        &self.options
    }

    /// Start a `GET` call.
    pub fn get(&self, url: impl Into<String>) -> HttpCall {
        HttpCall::new(self.clone(), Method::GET, url.into())
    }

    /// Start a `POST` call.
    pub fn post(&self, url: impl Into<String>) -> HttpCall {
        HttpCall::new(self.clone(), Method::POST, url.into())
    }

    pub(super) fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("options", &*self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_records_options() {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("locafinder-tests")
            .build()
            .unwrap();
        assert_eq!(http.options().timeout, Some(Duration::from_secs(5)));
        assert_eq!(http.options().user_agent.as_deref(), Some("locafinder-tests"));

        let untimed = HttpClient::builder().no_timeout().build().unwrap();
        assert_eq!(untimed.options().timeout, None);
    }

    #[test]
    fn test_clones_share_options() {
        let http = HttpClient::new();
        let clone = http.clone();
        assert!(Arc::ptr_eq(&http.options, &clone.options));
    }
}
