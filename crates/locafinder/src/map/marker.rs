//! Marker handles.

use std::sync::Arc;

use locafinder_net::LngLat;

use super::surface::{
    ActivationCallback, MapSurface, MarkerOverlay, MarkerStyle, OverlayId, PopupContent,
};
use crate::model::Point;

/// Binds one point to the overlay that shows it.
///
/// At most one handle exists per visible point. A handle is released
/// explicitly through the surface that owns its overlay.
#[derive(Debug)]
pub struct MarkerHandle {
    point: Arc<Point>,
    overlay: OverlayId,
    position: LngLat,
}

impl MarkerHandle {
    /// Attach an overlay for `point`. Returns `None` if the point has no coordinate.
    pub(crate) fn attach<S: MapSurface + ?Sized>(
        surface: &mut S,
        point: Arc<Point>,
        on_activate: ActivationCallback,
    ) -> Option<Self> {
        let position = point.coordinate()?;
        let overlay = surface.add_marker(MarkerOverlay {
            position,
            style: MarkerStyle::Point,
            popup: PopupContent::for_point(&point),
            on_activate: Some(on_activate),
        });
        Some(Self {
            point,
            overlay,
            position,
        })
    }

    /// Detach the overlay.
    pub(crate) fn release<S: MapSurface + ?Sized>(self, surface: &mut S) {
        surface.remove_marker(self.overlay);
    }

    /// The point shown by this marker.
    pub fn point(&self) -> &Arc<Point> {
        &self.point
    }

    /// Identifier of the point shown by this marker.
    pub fn point_id(&self) -> &str {
        &self.point.id
    }

    pub fn overlay(&self) -> OverlayId {
        self.overlay
    }

    pub fn position(&self) -> LngLat {
        self.position
    }

    /// Whether this handle still shows `point` exactly as it is now.
    pub(crate) fn is_current_for(&self, point: &Arc<Point>) -> bool {
        (Arc::ptr_eq(&self.point, point) || *self.point == **point)
            && point.coordinate() == Some(self.position)
    }
}
