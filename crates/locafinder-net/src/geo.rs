//! Geographic coordinate type shared by the directions client and the map layer.

use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in degrees.
///
/// Serialized as a `[lng, lat]` array, the GeoJSON position order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    /// Create a coordinate from longitude and latitude.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Whether both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    /// Format as the `lng,lat` path segment used by routing services.
    pub fn to_path_segment(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        [value.lng, value.lat]
    }
}

impl std::fmt::Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lng, self.lat)
    }
}
