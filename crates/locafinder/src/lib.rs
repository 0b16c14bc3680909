//! Locafinder: map-driven rental point discovery.
//!
//! This crate keeps a set of map markers consistent with a filtered list of
//! rentable points and a single selected point, across repeated filter,
//! selection and position changes.
//!
//! # Modules
//!
//! - [`model`]: points, the point store, the filter engine and market aggregates
//! - [`map`]: the map surface abstraction, marker synchronization, camera
//!   policy, selection, geolocation and routing, owned by a [`MapController`](map::MapController)
//! - [`actions`]: price prediction, booking, comparison and chat
//! - [`config`]: TOML configuration and client construction
//!
//! The reactive primitives of `locafinder-core` are re-exported at the root
//! and the networking crate is available as [`net`].
//!
//! # Example
//!
//! ```ignore
//! use locafinder::config::LocafinderConfig;
//! use locafinder::map::{HeadlessSurface, MapController};
//! use locafinder::model::{FilterCriteria, PointStore};
//!
//! let config = LocafinderConfig::load("locafinder.toml")?;
//! let http = config.http_client()?;
//! let store = PointStore::load(&config.webhook_client(http.clone())).await;
//!
//! let mut map = MapController::mount(HeadlessSurface::new(), config.map.clone());
//! map.load_points(store);
//! map.set_criteria(FilterCriteria::any().with_address("Hanoi"));
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod map;
pub mod model;

pub use error::{Error, Result};

pub use locafinder_core::{
    ConnectionId, PerfSpan, Property, ReadOnlyProperty, RequestSequence, RequestToken, Signal,
    logging,
};
pub use locafinder_net as net;
