//! The point store.
//!
//! Owns one snapshot of the point source. Every other component holds
//! shared `Arc<Point>` references into it, never copies.

use std::collections::HashSet;
use std::sync::Arc;

use locafinder_core::logging::targets;
use locafinder_net::WebhookClient;

use super::point::Point;
use crate::error::Result;

/// An immutable snapshot of the rentable points.
#[derive(Clone, Debug, Default)]
pub struct PointStore {
    points: Vec<Arc<Point>>,
}

impl PointStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw records.
    ///
    /// Records without an identifier get `#<index>`, their position in the
    /// snapshot. Ratings are clamped into range.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let points = points
            .into_iter()
            .enumerate()
            .map(|(index, mut point)| {
                if point.id.trim().is_empty() {
                    point.id = format!("#{index}");
                }
                point.normalize_rating();
                Arc::new(point)
            })
            .collect();
        Self { points }
    }

    /// Fetch the point source.
    ///
    /// Failures are returned to the caller; see [`PointStore::load`] for the
    /// degrading variant used at start-up.
    pub async fn fetch(client: &WebhookClient) -> Result<Self> {
        let points: Vec<Point> = client.fetch_collection().await?;
        let store = Self::from_points(points);
        tracing::info!(target: targets::STORE, count = store.len(), "points loaded");
        Ok(store)
    }

    /// Fetch the point source, degrading to an empty store on any failure.
    pub async fn load(client: &WebhookClient) -> Self {
        match Self::fetch(client).await {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(
                    target: targets::STORE,
                    error = %err,
                    "point source unavailable, continuing with no points"
                );
                Self::new()
            }
        }
    }

    /// All points in source order.
    pub fn points(&self) -> &[Arc<Point>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up a point by identifier.
    pub fn get(&self, id: &str) -> Option<&Arc<Point>> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Look up the first point with the given display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Point>> {
        self.points.iter().find(|p| p.name == name)
    }

    /// Distinct non-empty addresses, in first-seen order.
    pub fn unique_addresses(&self) -> Vec<&str> {
        distinct(self.points.iter().map(|p| p.address.as_str()))
    }

    /// Distinct non-empty categories, in first-seen order.
    pub fn unique_kinds(&self) -> Vec<&str> {
        distinct(self.points.iter().filter_map(|p| p.kind.as_deref()))
    }
}

/// Whether `id` has the `#<index>` form given to records without one.
///
/// Such ids name a position in one snapshot, not a record, so they do not
/// identify the same point across reloads.
pub(crate) fn is_derived_id(id: &str) -> bool {
    id.strip_prefix('#')
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .collect()
}

impl FromIterator<Point> for PointStore {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}
