//! The map layer: surface abstraction, marker synchronization, camera
//! policy, selection, geolocation and routing.
//!
//! [`MapController`] ties these together. Hosts implement [`MapSurface`]
//! for their map library, or use [`HeadlessSurface`].
//!
//! ```
//! use locafinder::map::{HeadlessSurface, MapController};
//! use locafinder::model::{FilterCriteria, Point, PointStore};
//! use locafinder::config::MapConfig;
//!
//! let mut map = MapController::mount(HeadlessSurface::new(), MapConfig::default());
//! map.load_points(PointStore::from_points([
//!     Point::new("1", "Shop A").at(105.0, 21.0).with_address("Hanoi"),
//!     Point::new("2", "Shop B").at(106.0, 10.0).with_address("HCMC"),
//! ]));
//!
//! map.set_criteria(FilterCriteria::any().with_address("Hanoi"));
//! assert_eq!(map.markers().live_ids(), vec!["1"]);
//! ```

mod camera;
mod controller;
mod geolocation;
mod headless;
mod marker;
mod routing;
mod selection;
mod surface;
mod sync;

pub use camera::{CameraCommand, CameraPolicy, FlyProfile, LngLatBounds};
pub use controller::MapController;
pub use geolocation::{GeolocationProvider, GeolocationWatch, SimulatedGeolocation, WatchId};
pub use headless::HeadlessSurface;
pub use marker::MarkerHandle;
pub use routing::{RouteRequest, RouteResponse, RouteTracker};
pub use selection::{
    SelectionCause, SelectionChange, SelectionController, SelectionRetention, SelectionState,
};
pub use surface::{
    ActivationCallback, MapSurface, MarkerOverlay, MarkerStyle, OverlayId, PopupContent,
};
pub use sync::{MarkerSynchronizer, SyncReport, SyncStrategy};
