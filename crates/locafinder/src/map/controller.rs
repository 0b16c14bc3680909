//! The map controller.
//!
//! [`MapController`] is the single owner of everything attached to a map: the
//! surface, the marker handles, the selection, the geolocation watch and the
//! route. It is created by [`MapController::mount`] and torn down by
//! [`MapController::dispose`] (or on drop).
//!
//! # Event flow
//!
//! Marker activation callbacks run inside the surface, where the surface is
//! already borrowed. They only update the [`SelectionController`] and queue a
//! camera intent; the host calls [`MapController::process_events`] afterwards
//! to let the controller move the camera.
//!
//! Any change of the selected point clears the route tracker at once, so a
//! route response requested for the old point is rejected. The drawn route
//! layer is removed the next time the controller holds the surface.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use locafinder_core::logging::targets;
use locafinder_core::{ConnectionId, PerfSpan};
use locafinder_net::LngLat;

use super::camera::{CameraCommand, LngLatBounds};
use super::geolocation::{GeolocationProvider, GeolocationWatch, WatchId};
use super::routing::{RouteRequest, RouteResponse, RouteTracker};
use super::selection::SelectionController;
use super::surface::{
    ActivationCallback, MapSurface, MarkerOverlay, MarkerStyle, OverlayId, PopupContent,
};
use super::sync::{MarkerSynchronizer, SyncReport};
use crate::config::MapConfig;
use crate::error::{Error, Result};
use crate::model::{self, FilterCriteria, Point, PointStore};

type IntentQueue = Arc<Mutex<VecDeque<CameraCommand>>>;

/// Owns a map surface and keeps it in line with the filtered points.
pub struct MapController<S: MapSurface> {
    surface: S,
    config: MapConfig,
    store: PointStore,
    criteria: FilterCriteria,
    filtered: Vec<Arc<Point>>,
    markers: MarkerSynchronizer,
    selection: Arc<SelectionController>,
    routes: Arc<RouteTracker>,
    geolocation: Option<GeolocationWatch>,
    user_marker: Option<OverlayId>,
    user_position: Option<LngLat>,
    intents: IntentQueue,
    activation_connection: ConnectionId,
    selection_connection: ConnectionId,
    route_shown: bool,
    disposed: bool,
}

impl<S: MapSurface> MapController<S> {
    /// Take ownership of `surface` and move the camera to the configured center.
    pub fn mount(mut surface: S, config: MapConfig) -> Self {
        surface.move_camera(CameraCommand::JumpTo {
            center: config.center,
            zoom: config.initial_zoom,
        });
        surface.move_camera(config.load_fly.toward(config.center));

        let selection = Arc::new(SelectionController::new(config.retention));
        let intents: IntentQueue = Arc::default();
        let activation_connection = {
            let intents = intents.clone();
            let profile = config.marker_select;
            selection.activated.connect(move |(point, cause)| {
                if !cause.animates_camera() {
                    return;
                }
                if let Some(center) = point.coordinate() {
                    intents.lock().push_back(profile.toward(center));
                }
            })
        };

        let routes = Arc::new(RouteTracker::new());
        let selection_connection = {
            let routes = Arc::downgrade(&routes);
            selection.selection_changed.connect(move |_| {
                if let Some(routes) = routes.upgrade() {
                    routes.clear();
                }
            })
        };

        tracing::debug!(target: targets::MAP, center = %config.center, "map mounted");
        Self {
            surface,
            markers: MarkerSynchronizer::new(config.sync),
            config,
            store: PointStore::new(),
            criteria: FilterCriteria::any(),
            filtered: Vec::new(),
            selection,
            routes,
            geolocation: None,
            user_marker: None,
            user_position: None,
            intents,
            activation_connection,
            selection_connection,
            route_shown: false,
            disposed: false,
        }
    }

    /// Use `provider` for [`start_tracking`](Self::start_tracking).
    pub fn with_geolocation(mut self, provider: Arc<dyn GeolocationProvider>) -> Self {
        self.geolocation = Some(GeolocationWatch::new(provider));
        self
    }

    /// Replace the point snapshot and re-apply the current criteria.
    ///
    /// The selection is rebound to the new snapshot's record (see
    /// [`SelectionController::rebind`]). The camera is not moved.
    pub fn load_points(&mut self, store: PointStore) -> SyncReport {
        self.store = store;
        self.refresh()
    }

    /// Apply new criteria: recompute the filtered set, synchronize markers,
    /// apply the retention policy and move the camera.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> SyncReport {
        self.criteria = criteria;
        let report = self.refresh();
        self.frame_filtered();
        report
    }

    /// Replace the point snapshot, then move the camera over the filtered
    /// set the way a criteria change does. Hosts use this when the data
    /// arrives after mount.
    pub fn load_points_and_frame(&mut self, store: PointStore) -> SyncReport {
        let report = self.load_points(store);
        self.frame_filtered();
        report
    }

    fn frame_filtered(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(command) = self.config.camera.for_filtered(&self.filtered) {
            self.surface.move_camera(command);
        }
    }

    /// Apply criteria that match every point.
    pub fn reset_criteria(&mut self) -> SyncReport {
        self.set_criteria(FilterCriteria::any())
    }

    fn refresh(&mut self) -> SyncReport {
        if self.disposed {
            tracing::warn!(target: targets::MAP, "filter change ignored on disposed map");
            return SyncReport::default();
        }
        let _span = PerfSpan::new("map_refresh");
        self.selection.rebind(self.store.points());
        self.filtered = model::apply(self.store.points(), &self.criteria);

        let selection = self.selection.clone();
        let report = self.markers.sync(&mut self.surface, &self.filtered, |point| {
            activation(&selection, point)
        });
        self.selection.retain_within(&self.filtered);
        self.sync_route_layer();
        tracing::debug!(
            target: targets::MAP,
            total = self.store.len(),
            filtered = self.filtered.len(),
            markers = self.markers.len(),
            "filtered set applied"
        );
        report
    }

    /// Move the camera for every queued intent. Returns how many were applied.
    pub fn process_events(&mut self) -> usize {
        let drained: Vec<CameraCommand> = self.intents.lock().drain(..).collect();
        if self.disposed {
            return 0;
        }
        self.sync_route_layer();
        let count = drained.len();
        for command in drained {
            self.surface.move_camera(command);
        }
        count
    }

    /// Select a point from the filtered list. The camera does not move.
    pub fn activate_from_list(&mut self, point: Arc<Point>) {
        self.selection.activate_from_list(point);
        self.sync_route_layer();
    }

    /// Consume the selection and fly to it.
    pub fn zoom_to_selection(&mut self) -> Option<Arc<Point>> {
        let point = self.selection.take_for_zoom()?;
        self.sync_route_layer();
        if let Some(center) = point.coordinate() {
            self.surface
                .move_camera(self.config.zoom_to_location.toward(center));
        }
        Some(point)
    }

    /// Close the detail view. The camera does not move.
    pub fn dismiss_selection(&mut self) -> bool {
        let dismissed = self.selection.dismiss();
        self.sync_route_layer();
        dismissed
    }

    /// Start watching the device position, replacing any previous watch.
    pub fn start_tracking(&mut self) -> Result<WatchId> {
        let watch = self
            .geolocation
            .as_mut()
            .ok_or_else(|| Error::geolocation("no position source configured"))?;
        watch.start()
    }

    /// Stop watching the device position. Returns `true` if a watch was active.
    pub fn stop_tracking(&mut self) -> bool {
        self.geolocation.as_mut().is_some_and(GeolocationWatch::stop)
    }

    /// Handle a position update from the active watch.
    ///
    /// Moves (or creates) the user-location marker and flies to it. When a
    /// point with a coordinate is selected, returns the route request the
    /// host should fetch and pass to [`apply_route`](Self::apply_route).
    pub fn update_position(&mut self, position: LngLat) -> Option<RouteRequest> {
        if self.disposed || !position.is_finite() {
            return None;
        }
        self.user_position = Some(position);

        let moved = self
            .user_marker
            .is_some_and(|id| self.surface.move_marker(id, position));
        if !moved {
            self.user_marker = Some(self.surface.add_marker(MarkerOverlay {
                position,
                style: MarkerStyle::UserLocation,
                popup: PopupContent::user_location(),
                on_activate: None,
            }));
        }
        self.surface
            .move_camera(self.config.user_location.toward(position));

        let destination = self.selection.current()?.coordinate()?;
        Some(self.routes.begin(position, destination))
    }

    /// Apply a route response. Returns `false` if it was superseded.
    pub fn apply_route(&mut self, response: RouteResponse) -> bool {
        if self.disposed || !self.routes.apply(response) {
            return false;
        }
        match self.routes.current() {
            Some(route) => {
                self.surface.show_route(&route.geometry);
                self.route_shown = true;
                if let Some(bounds) = LngLatBounds::from_coords(route.geometry.iter().copied()) {
                    self.surface.move_camera(CameraCommand::FitBounds {
                        bounds,
                        padding: self.config.route_padding,
                    });
                }
            }
            None => {
                self.surface.clear_route();
                self.route_shown = false;
            }
        }
        true
    }

    /// Remove the drawn route once the tracker no longer holds one.
    fn sync_route_layer(&mut self) {
        if self.disposed || !self.route_shown || self.routes.current().is_some() {
            return;
        }
        self.surface.clear_route();
        self.route_shown = false;
        tracing::debug!(target: targets::ROUTING, "route layer cleared with selection");
    }

    /// Release every overlay, clear the route and cancel the position watch.
    ///
    /// Calling this more than once has no further effect.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        let released = self.markers.release_all(&mut self.surface);
        if let Some(id) = self.user_marker.take() {
            self.surface.remove_marker(id);
        }
        self.routes.clear();
        self.surface.clear_route();
        self.route_shown = false;
        if let Some(watch) = self.geolocation.as_mut() {
            watch.stop();
        }
        self.selection.activated.disconnect(self.activation_connection);
        self.selection
            .selection_changed
            .disconnect(self.selection_connection);
        self.intents.lock().clear();
        tracing::debug!(target: targets::MAP, released, "map disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn store(&self) -> &PointStore {
        &self.store
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The current filtered set, in store order.
    pub fn filtered(&self) -> &[Arc<Point>] {
        &self.filtered
    }

    pub fn markers(&self) -> &MarkerSynchronizer {
        &self.markers
    }

    pub fn selection(&self) -> &Arc<SelectionController> {
        &self.selection
    }

    pub fn routes(&self) -> &Arc<RouteTracker> {
        &self.routes
    }

    /// The last reported device position.
    pub fn user_position(&self) -> Option<LngLat> {
        self.user_position
    }

    pub fn is_tracking(&self) -> bool {
        self.geolocation.as_ref().is_some_and(GeolocationWatch::is_active)
    }
}

impl<S: MapSurface> Drop for MapController<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S: MapSurface + std::fmt::Debug> std::fmt::Debug for MapController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapController")
            .field("surface", &self.surface)
            .field("criteria", &self.criteria)
            .field("filtered", &self.filtered.len())
            .field("markers", &self.markers.len())
            .field("selection", &self.selection.current().map(|p| p.id.clone()))
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

fn activation(selection: &Arc<SelectionController>, point: &Arc<Point>) -> ActivationCallback {
    let selection = Arc::downgrade(selection);
    let point = point.clone();
    Arc::new(move || {
        if let Some(selection) = selection.upgrade() {
            selection.activate_from_marker(point.clone());
        }
    })
}
