//! An in-memory map surface.
//!
//! Records every overlay, camera movement and route so that non-graphical
//! hosts (and tests) can drive the map controller and inspect the result.

use slotmap::SlotMap;

use locafinder_core::logging::targets;
use locafinder_net::LngLat;

use super::camera::CameraCommand;
use super::surface::{MapSurface, MarkerOverlay, MarkerStyle, OverlayId};

/// A [`MapSurface`] that draws nothing.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    markers: SlotMap<OverlayId, MarkerOverlay>,
    camera: Vec<CameraCommand>,
    route: Option<Vec<LngLat>>,
    removed: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached markers of any style.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Attached rentable-point markers.
    pub fn point_markers(&self) -> impl Iterator<Item = (OverlayId, &MarkerOverlay)> {
        self.markers
            .iter()
            .filter(|(_, m)| m.style == MarkerStyle::Point)
    }

    /// The attached overlay with the given id.
    pub fn marker(&self, id: OverlayId) -> Option<&MarkerOverlay> {
        self.markers.get(id)
    }

    /// The first attached point marker at `position`.
    pub fn marker_at(&self, position: LngLat) -> Option<OverlayId> {
        self.point_markers()
            .find(|(_, m)| m.position == position)
            .map(|(id, _)| id)
    }

    /// The attached user-location marker, if any.
    pub fn user_marker(&self) -> Option<&MarkerOverlay> {
        self.markers
            .values()
            .find(|m| m.style == MarkerStyle::UserLocation)
    }

    /// Every camera command received, oldest first.
    pub fn camera_moves(&self) -> &[CameraCommand] {
        &self.camera
    }

    pub fn last_camera(&self) -> Option<&CameraCommand> {
        self.camera.last()
    }

    /// The drawn route line, if any.
    pub fn route(&self) -> Option<&[LngLat]> {
        self.route.as_deref()
    }

    /// Total number of markers detached so far.
    pub fn removed_count(&self) -> usize {
        self.removed
    }

    /// Simulate the user activating a marker's detail control.
    ///
    /// Returns `false` if the marker is not attached or has no callback.
    pub fn activate(&self, id: OverlayId) -> bool {
        let Some(callback) = self.markers.get(id).and_then(|m| m.on_activate.clone()) else {
            return false;
        };
        callback();
        true
    }
}

impl MapSurface for HeadlessSurface {
    fn add_marker(&mut self, overlay: MarkerOverlay) -> OverlayId {
        let id = self.markers.insert(overlay);
        tracing::trace!(target: targets::MAP, ?id, "marker attached");
        id
    }

    fn move_marker(&mut self, id: OverlayId, position: LngLat) -> bool {
        match self.markers.get_mut(id) {
            Some(marker) => {
                marker.position = position;
                true
            }
            None => false,
        }
    }

    fn remove_marker(&mut self, id: OverlayId) {
        if self.markers.remove(id).is_some() {
            self.removed += 1;
        }
    }

    fn move_camera(&mut self, command: CameraCommand) {
        self.camera.push(command);
    }

    fn show_route(&mut self, geometry: &[LngLat]) {
        self.route = Some(geometry.to_vec());
    }

    fn clear_route(&mut self) {
        self.route = None;
    }
}
