//! Networking module for Locafinder.
//!
//! This crate provides the remote collaborators of the rental map:
//!
//! - **HTTP**: A shared `reqwest`-based JSON transport with builder configuration
//! - **Webhooks**: Typed calls for the point source, price prediction,
//!   comparison, booking and chat automations
//! - **Directions**: Route geometry and turn-by-turn steps between two points
//!
//! # HTTP
//!
//! ```ignore
//! use locafinder_net::HttpClient;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(20))
//!     .user_agent("Locafinder/1.0")
//!     .build()?;
//! ```
//!
//! # Webhooks
//!
//! ```ignore
//! use locafinder_net::{WebhookClient, WebhookEndpoints};
//! use locafinder_net::webhook::PredictRequest;
//!
//! let webhooks = WebhookClient::new(client.clone(), WebhookEndpoints::default());
//! let prediction = webhooks
//!     .predict(&PredictRequest {
//!         name: "Shop A".into(),
//!         address: "Hanoi".into(),
//!         area: 40.0,
//!         price: 12.0,
//!     })
//!     .await?;
//! ```
//!
//! # Directions
//!
//! ```ignore
//! use locafinder_net::{DirectionsClient, DirectionsEndpoint, LngLat};
//!
//! let directions = DirectionsClient::new(client, DirectionsEndpoint::default());
//! if let Some(route) = directions
//!     .route(LngLat::new(105.82, 21.02), LngLat::new(105.85, 21.03))
//!     .await?
//! {
//!     for step in &route.steps {
//!         println!("{} - {}", step.instruction, step.distance_label());
//!     }
//! }
//! ```

pub mod de;
pub mod directions;
mod endpoints;
mod error;
mod geo;
pub mod http;
pub mod webhook;

pub use directions::{DirectionsClient, Route, RouteStep};
pub use endpoints::{DirectionsEndpoint, WebhookEndpoints};
pub use error::{NetworkError, Result};
pub use geo::LngLat;
pub use webhook::WebhookClient;

pub use http::{HttpCall, HttpClient, HttpClientBuilder, HttpOptions, HttpResponse};
