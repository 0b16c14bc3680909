//! JSON-over-HTTP transport shared by the webhook and directions clients.
//!
//! Every collaborator speaks JSON, so a call carries at most a JSON body and
//! a list of query pairs. Failures are mapped to [`NetworkError`] when the
//! call is sent, including a body that could not be encoded.
//!
//! [`NetworkError`]: crate::NetworkError

mod call;
mod client;
mod response;

pub use call::HttpCall;
pub use client::{HttpClient, HttpClientBuilder, HttpOptions};
pub use response::HttpResponse;
