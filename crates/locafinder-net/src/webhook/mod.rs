//! Typed clients for the automation webhooks.
//!
//! Each remote collaborator (point source, prediction, comparison, booking,
//! chat) is an opaque request/response contract. [`WebhookClient`] turns
//! those contracts into typed calls and reports replies that decode but do
//! not carry the expected fields as [`NetworkError::UnexpectedShape`].
//!
//! # Example
//!
//! ```ignore
//! use locafinder_net::{HttpClient, WebhookClient, WebhookEndpoints};
//!
//! let client = WebhookClient::new(HttpClient::new(), WebhookEndpoints::default());
//! let rows: Vec<serde_json::Value> = client.fetch_collection().await?;
//! ```

mod reply;
mod types;

use serde::de::DeserializeOwned;
use serde_json::Value;

use locafinder_core::logging::targets;

use crate::endpoints::WebhookEndpoints;
use crate::error::{NetworkError, Result};
use crate::http::HttpClient;

pub use reply::{first_output, joined_output, strip_code_fence};
pub use types::{
    BookingRequest, ChatRequest, CompareRequest, ComparedProperty, Comparison, PredictRequest,
    Prediction,
};

/// Client for the automation webhooks.
///
/// Cheap to clone; clones share the underlying [`HttpClient`].
#[derive(Clone, Debug)]
pub struct WebhookClient {
    http: HttpClient,
    endpoints: WebhookEndpoints,
}

impl WebhookClient {
    /// Create a client for the given endpoints.
    pub fn new(http: HttpClient, endpoints: WebhookEndpoints) -> Self {
        Self { http, endpoints }
    }

    /// The configured endpoints.
    pub fn endpoints(&self) -> &WebhookEndpoints {
        &self.endpoints
    }

    /// Fetch the point collection.
    ///
    /// Accepts either a bare JSON array or an object with a `data` array; an
    /// object without `data` is an empty collection. Items that fail to
    /// decode as `T` are skipped with a warning.
    pub async fn fetch_collection<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let reply: Value = self
            .http
            .get(&self.endpoints.points)
            .send()
            .await?
            .check_status()
            .await?
            .json()
            .await?;
        let items = collection_items(reply)?;

        let total = items.len();
        let decoded: Vec<T> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(
                        target: targets::WEBHOOK,
                        index,
                        error = %err,
                        "skipping undecodable item"
                    );
                    None
                }
            })
            .collect();
        tracing::debug!(
            target: targets::WEBHOOK,
            total,
            decoded = decoded.len(),
            "fetched collection"
        );
        Ok(decoded)
    }

    /// Request a price prediction.
    ///
    /// The reply's `output` text is a JSON object, usually inside a Markdown
    /// code fence; the fence is stripped before decoding.
    pub async fn predict(&self, request: &PredictRequest) -> Result<Prediction> {
        let reply = self.post_json(&self.endpoints.predict, request).await?;
        let output = first_output(&reply)
            .ok_or_else(|| NetworkError::unexpected_shape("prediction reply has no output"))?;
        parse_prediction(&output)
    }

    /// Compare two points by name.
    pub async fn compare(&self, request: &CompareRequest) -> Result<Comparison> {
        let reply = self.post_json(&self.endpoints.compare, request).await?;
        Ok(serde_json::from_value(reply)?)
    }

    /// Send a chat prompt, returning the assistant's text.
    ///
    /// `Ok(None)` means the service answered without any text.
    pub async fn chat(&self, request: &ChatRequest) -> Result<Option<String>> {
        let reply = self.post_json(&self.endpoints.chat, request).await?;
        Ok(joined_output(&reply))
    }

    /// Submit a viewing booking. The reply body is ignored.
    pub async fn book(&self, request: &BookingRequest) -> Result<()> {
        self.http
            .post(&self.endpoints.booking)
            .json(request)
            .send()
            .await?
            .check_status()
            .await?;
        tracing::info!(target: targets::WEBHOOK, point = %request.point_name, "booking submitted");
        Ok(())
    }

    async fn post_json<B: serde::Serialize>(&self, url: &str, body: &B) -> Result<Value> {
        self.http
            .post(url)
            .json(body)
            .send()
            .await?
            .check_status()
            .await?
            .json()
            .await
    }
}

fn collection_items(reply: Value) -> Result<Vec<Value>> {
    match reply {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(_) => Err(NetworkError::unexpected_shape("`data` is not an array")),
        },
        _ => Err(NetworkError::unexpected_shape(
            "collection reply is neither an array nor an object",
        )),
    }
}

/// Parse the `output` text of a prediction reply.
///
/// ```
/// use locafinder_net::webhook::parse_prediction;
///
/// let p = parse_prediction("```json\n{\"predicted_price\":12,\"advice\":\"ok\"}\n```").unwrap();
/// assert_eq!(p.predicted_price, Some(12.0));
/// assert_eq!(p.advice, "ok");
/// ```
pub fn parse_prediction(output: &str) -> Result<Prediction> {
    let clean = strip_code_fence(output);
    Ok(serde_json::from_str(&clean)?)
}
