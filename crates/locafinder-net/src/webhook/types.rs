//! Request and reply payloads of the automation webhooks.

use serde::{Deserialize, Serialize};

use crate::de;

/// Body of a price prediction request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictRequest {
    pub name: String,
    pub address: String,
    pub area: f64,
    pub price: f64,
}

/// A parsed price prediction.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Prediction {
    /// Predicted monthly price, in the same unit as the point's price.
    #[serde(default, deserialize_with = "de::opt_number")]
    pub predicted_price: Option<f64>,
    /// Free-text recommendation.
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub advice: String,
}

/// Body of a comparison request: the two point names to compare.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompareRequest {
    pub prop1: String,
    pub prop2: String,
}

/// One side of a comparison reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparedProperty {
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub price: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub area: f64,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub address: String,
    #[serde(rename = "pricePerM2", default, deserialize_with = "de::opt_number")]
    pub price_per_m2: Option<f64>,
}

impl ComparedProperty {
    /// Price per square metre, rounded to two decimals.
    ///
    /// Uses the value supplied by the service when present, otherwise
    /// computes it. `None` when the area is not positive.
    pub fn price_per_area(&self) -> Option<f64> {
        let raw = match self.price_per_m2 {
            Some(value) => value,
            None if self.area > 0.0 => self.price / self.area,
            None => return None,
        };
        Some((raw * 100.0).round() / 100.0)
    }
}

/// A comparison reply, returned verbatim to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(default)]
    pub comparison: Vec<ComparedProperty>,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub ai_advice: String,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub recommended: String,
}

impl Comparison {
    /// The compared property the service recommends, if it names one of them.
    pub fn recommended_property(&self) -> Option<&ComparedProperty> {
        if self.recommended.is_empty() {
            return None;
        }
        self.comparison.iter().find(|p| p.name == self.recommended)
    }
}

/// Body of a chat request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
}

/// Body of a viewing booking.
///
/// Carries the visitor's form fields plus the booked point's details.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookingRequest {
    /// ISO-8601 submission time.
    pub timestamp: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub note: String,
    pub point_name: String,
    pub address: String,
    pub price: f64,
    pub area: f64,
}
