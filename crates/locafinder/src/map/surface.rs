//! The map surface abstraction.
//!
//! A [`MapSurface`] is whatever actually draws the map: a WebView bridge, a
//! native map widget, or the in-memory [`HeadlessSurface`](super::HeadlessSurface).
//! Only the map controller mutates it.

use std::sync::Arc;

use slotmap::new_key_type;

use locafinder_net::LngLat;

use super::camera::CameraCommand;
use crate::model::{Point, StarRating};

new_key_type! {
    /// Identifies one overlay element on a map surface.
    pub struct OverlayId;
}

/// Invoked by the surface when the user activates a marker's detail control.
pub type ActivationCallback = Arc<dyn Fn() + Send + Sync>;

/// Visual role of a marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerStyle {
    /// A rentable point.
    Point,
    /// The user's own position.
    UserLocation,
}

/// Structured popup content, rendered by the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub address: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: f64,
    pub area: f64,
    pub popularity: u64,
    pub rating: Option<StarRating>,
}

impl PopupContent {
    /// Popup content describing `point`.
    pub fn for_point(point: &Point) -> Self {
        Self {
            title: point.name.clone(),
            address: point.address.clone(),
            description: point.description.clone(),
            image: point.image.clone(),
            price: point.price,
            area: point.area,
            popularity: point.popularity,
            rating: point.stars(),
        }
    }

    /// Popup content for the user-location marker.
    pub fn user_location() -> Self {
        Self {
            title: "Your location".to_string(),
            address: String::new(),
            description: None,
            image: None,
            price: 0.0,
            area: 0.0,
            popularity: 0,
            rating: None,
        }
    }
}

/// Everything a surface needs to draw one marker.
#[derive(Clone)]
pub struct MarkerOverlay {
    pub position: LngLat,
    pub style: MarkerStyle,
    pub popup: PopupContent,
    /// Bound at creation; `None` for markers without a detail control.
    pub on_activate: Option<ActivationCallback>,
}

impl std::fmt::Debug for MarkerOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerOverlay")
            .field("position", &self.position)
            .field("style", &self.style)
            .field("popup", &self.popup.title)
            .field("activatable", &self.on_activate.is_some())
            .finish()
    }
}

/// A drawable map.
pub trait MapSurface {
    /// Attach a marker overlay. Never fails.
    fn add_marker(&mut self, overlay: MarkerOverlay) -> OverlayId;

    /// Move an existing marker. Returns `false` if `id` is not attached.
    fn move_marker(&mut self, id: OverlayId, position: LngLat) -> bool;

    /// Detach a marker. Must be a no-op when `id` is already detached.
    fn remove_marker(&mut self, id: OverlayId);

    /// Move the camera.
    fn move_camera(&mut self, command: CameraCommand);

    /// Draw a route line, replacing any previous one.
    fn show_route(&mut self, geometry: &[LngLat]);

    /// Remove the route line, if any.
    fn clear_route(&mut self);
}

impl<S: MapSurface + ?Sized> MapSurface for Box<S> {
    fn add_marker(&mut self, overlay: MarkerOverlay) -> OverlayId {
        (**self).add_marker(overlay)
    }

    fn move_marker(&mut self, id: OverlayId, position: LngLat) -> bool {
        (**self).move_marker(id, position)
    }

    fn remove_marker(&mut self, id: OverlayId) {
        (**self).remove_marker(id)
    }

    fn move_camera(&mut self, command: CameraCommand) {
        (**self).move_camera(command)
    }

    fn show_route(&mut self, geometry: &[LngLat]) {
        (**self).show_route(geometry)
    }

    fn clear_route(&mut self) {
        (**self).clear_route()
    }
}
