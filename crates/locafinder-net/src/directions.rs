//! Directions service client.
//!
//! Requests a driving route between two coordinates with GeoJSON geometry
//! and turn-by-turn steps.

use serde::Deserialize;

use locafinder_core::logging::targets;

use crate::endpoints::DirectionsEndpoint;
use crate::error::Result;
use crate::geo::LngLat;
use crate::http::HttpClient;

/// One turn-by-turn instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteStep {
    /// Human-readable maneuver instruction.
    pub instruction: String,
    /// Distance covered by this step, in metres.
    pub distance_m: f64,
}

impl RouteStep {
    /// Distance in kilometres with two decimals, e.g. `"1.25 km"`.
    pub fn distance_label(&self) -> String {
        format!("{:.2} km", self.distance_m / 1000.0)
    }
}

/// A route returned by the directions service.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Line geometry from origin to destination.
    pub geometry: Vec<LngLat>,
    /// Steps of the first leg.
    pub steps: Vec<RouteStep>,
    /// Total distance in metres.
    pub distance_m: f64,
    /// Estimated duration in seconds.
    pub duration_s: f64,
}

#[derive(Deserialize)]
struct DirectionsReply {
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Deserialize)]
struct RawRoute {
    geometry: RawGeometry,
    #[serde(default)]
    legs: Vec<RawLeg>,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Deserialize)]
struct RawGeometry {
    coordinates: Vec<LngLat>,
}

#[derive(Deserialize)]
struct RawLeg {
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Deserialize)]
struct RawStep {
    maneuver: RawManeuver,
    #[serde(default)]
    distance: f64,
}

#[derive(Deserialize)]
struct RawManeuver {
    #[serde(default)]
    instruction: String,
}

impl From<RawRoute> for Route {
    fn from(raw: RawRoute) -> Self {
        let steps = raw
            .legs
            .into_iter()
            .next()
            .map(|leg| {
                leg.steps
                    .into_iter()
                    .map(|s| RouteStep {
                        instruction: s.maneuver.instruction,
                        distance_m: s.distance,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            geometry: raw.geometry.coordinates,
            steps,
            distance_m: raw.distance,
            duration_s: raw.duration,
        }
    }
}

/// Client for the directions service.
#[derive(Clone, Debug)]
pub struct DirectionsClient {
    http: HttpClient,
    endpoint: DirectionsEndpoint,
}

impl DirectionsClient {
    /// Create a client for the given endpoint.
    pub fn new(http: HttpClient, endpoint: DirectionsEndpoint) -> Self {
        Self { http, endpoint }
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &DirectionsEndpoint {
        &self.endpoint
    }

    /// The request URL for a route, without query parameters.
    pub fn route_url(&self, from: LngLat, to: LngLat) -> String {
        format!(
            "{}/{}/{};{}",
            self.endpoint.base_url.trim_end_matches('/'),
            self.endpoint.profile,
            from.to_path_segment(),
            to.to_path_segment()
        )
    }

    /// Fetch the first route between two coordinates.
    ///
    /// Returns `Ok(None)` when the service finds no route.
    pub async fn route(&self, from: LngLat, to: LngLat) -> Result<Option<Route>> {
        let mut request = self
            .http
            .get(self.route_url(from, to))
            .query("geometries", "geojson")
            .query("steps", "true");
        if let Some(token) = &self.endpoint.access_token {
            request = request.query("access_token", token.clone());
        }

        let reply: DirectionsReply = request
            .send()
            .await?
            .check_status()
            .await?
            .json()
            .await?;
        let route = reply.routes.into_iter().next().map(Route::from);
        match &route {
            Some(r) => tracing::debug!(
                target: targets::DIRECTIONS,
                %from, %to,
                points = r.geometry.len(),
                steps = r.steps.len(),
                "route received"
            ),
            None => tracing::info!(target: targets::DIRECTIONS, %from, %to, "no route found"),
        }
        Ok(route)
    }
}
