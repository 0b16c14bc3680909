//! Camera commands and the filter camera policy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use locafinder_net::LngLat;

use crate::model::Point;

/// A zoom level and animation speed for a fly-to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlyProfile {
    pub zoom: f64,
    pub speed: f64,
}

impl FlyProfile {
    pub const fn new(zoom: f64, speed: f64) -> Self {
        Self { zoom, speed }
    }

    /// A fly-to command toward `center` with this profile.
    pub fn toward(self, center: LngLat) -> CameraCommand {
        CameraCommand::FlyTo {
            center,
            zoom: self.zoom,
            speed: self.speed,
        }
    }
}

/// An axis-aligned longitude/latitude box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LngLatBounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl LngLatBounds {
    /// A degenerate box around a single coordinate.
    pub fn around(coord: LngLat) -> Self {
        Self {
            south_west: coord,
            north_east: coord,
        }
    }

    /// Grow the box to contain `coord`.
    pub fn extend(&mut self, coord: LngLat) {
        self.south_west.lng = self.south_west.lng.min(coord.lng);
        self.south_west.lat = self.south_west.lat.min(coord.lat);
        self.north_east.lng = self.north_east.lng.max(coord.lng);
        self.north_east.lat = self.north_east.lat.max(coord.lat);
    }

    /// The smallest box containing every coordinate, or `None` for none.
    pub fn from_coords(coords: impl IntoIterator<Item = LngLat>) -> Option<Self> {
        let mut coords = coords.into_iter();
        let mut bounds = Self::around(coords.next()?);
        for coord in coords {
            bounds.extend(coord);
        }
        Some(bounds)
    }

    pub fn contains(&self, coord: LngLat) -> bool {
        (self.south_west.lng..=self.north_east.lng).contains(&coord.lng)
            && (self.south_west.lat..=self.north_east.lat).contains(&coord.lat)
    }

    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.south_west.lng + self.north_east.lng) / 2.0,
            (self.south_west.lat + self.north_east.lat) / 2.0,
        )
    }
}

/// A camera movement requested of the map surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
    /// Move instantly.
    JumpTo { center: LngLat, zoom: f64 },
    /// Animate toward a center and zoom.
    FlyTo { center: LngLat, zoom: f64, speed: f64 },
    /// Animate so the bounds fill the viewport minus `padding` pixels.
    FitBounds { bounds: LngLatBounds, padding: f64 },
}

/// How the camera reacts to a new filtered set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPolicy {
    /// Used when exactly one filtered point can be shown.
    pub single: FlyProfile,
    /// Padding when fitting several points.
    pub fit_padding: f64,
}

impl Default for CameraPolicy {
    fn default() -> Self {
        Self {
            single: FlyProfile::new(15.0, 1.2),
            fit_padding: 80.0,
        }
    }
}

impl CameraPolicy {
    /// The camera command for `filtered`, counting only points with coordinates.
    ///
    /// One point: fly to it. Several: fit their bounds. None: leave the
    /// camera where it is.
    pub fn for_filtered(&self, filtered: &[Arc<Point>]) -> Option<CameraCommand> {
        let coords: Vec<LngLat> = filtered.iter().filter_map(|p| p.coordinate()).collect();
        match coords.as_slice() {
            [] => None,
            [only] => Some(self.single.toward(*only)),
            many => LngLatBounds::from_coords(many.iter().copied()).map(|bounds| {
                CameraCommand::FitBounds {
                    bounds,
                    padding: self.fit_padding,
                }
            }),
        }
    }
}
