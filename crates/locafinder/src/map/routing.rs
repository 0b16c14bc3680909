//! Route tracking.
//!
//! A route to the selected point is requested on every position update, so
//! several requests may be in flight at once. Each request carries a
//! [`RequestToken`]; only the response for the latest token is applied.

use std::sync::Arc;

use locafinder_core::logging::targets;
use locafinder_core::{Property, RequestSequence, RequestToken, Signal};
use locafinder_net::{DirectionsClient, LngLat, Route, RouteStep};

use crate::error::Result;

/// A route request issued by the [`RouteTracker`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteRequest {
    pub token: RequestToken,
    pub from: LngLat,
    pub to: LngLat,
}

impl RouteRequest {
    /// Ask the directions service for this route.
    pub async fn fetch(self, client: &DirectionsClient) -> Result<RouteResponse> {
        let route = client.route(self.from, self.to).await?;
        Ok(RouteResponse {
            token: self.token,
            route,
        })
    }
}

/// The answer to a [`RouteRequest`]. `route` is `None` when no route exists.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteResponse {
    pub token: RequestToken,
    pub route: Option<Route>,
}

/// Holds the current route and rejects stale responses.
#[derive(Debug, Default)]
pub struct RouteTracker {
    sequence: RequestSequence,
    current: Property<Option<Arc<Route>>>,
    /// Emitted when the current route changes.
    pub route_changed: Signal<Option<Arc<Route>>>,
}

impl RouteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a request, superseding every earlier one.
    pub fn begin(&self, from: LngLat, to: LngLat) -> RouteRequest {
        let token = self.sequence.next();
        tracing::debug!(target: targets::ROUTING, %token, %from, %to, "route requested");
        RouteRequest { token, from, to }
    }

    /// Apply a response. Returns `false` if it was superseded.
    pub fn apply(&self, response: RouteResponse) -> bool {
        if !self.sequence.is_current(response.token) {
            tracing::debug!(
                target: targets::ROUTING,
                token = %response.token,
                "stale route response dropped"
            );
            return false;
        }
        let route = response.route.map(Arc::new);
        if self.current.set(route.clone()) {
            self.route_changed.emit(route);
        }
        true
    }

    /// Drop the current route and supersede outstanding requests.
    pub fn clear(&self) {
        self.sequence.invalidate();
        if self.current.set(None) {
            self.route_changed.emit(None);
        }
    }

    pub fn current(&self) -> Option<Arc<Route>> {
        self.current.get()
    }

    /// Turn-by-turn steps of the current route.
    pub fn steps(&self) -> Vec<RouteStep> {
        self.current
            .with(|route| route.as_ref().map(|r| r.steps.clone()).unwrap_or_default())
    }
}
