//! Marker synchronization.
//!
//! Keeps the live marker set equal to the filtered set: exactly one handle
//! per filtered point that has a coordinate, and none for anything else.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use locafinder_core::PerfSpan;
use locafinder_core::logging::targets;

use super::marker::MarkerHandle;
use super::surface::{ActivationCallback, MapSurface};
use crate::model::Point;

/// How a new filtered set is applied to the live markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    /// Release every marker, then create one per filtered point.
    #[default]
    Rebuild,
    /// Diff by identifier; unchanged markers are kept.
    Reconcile,
}

/// What one synchronization pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub released: usize,
    pub kept: usize,
    /// Filtered points without a coordinate.
    pub hidden: usize,
    /// Later occurrences of an identifier already shown.
    pub duplicates: usize,
}

/// Owns the live [`MarkerHandle`]s.
#[derive(Debug, Default)]
pub struct MarkerSynchronizer {
    strategy: SyncStrategy,
    handles: Vec<MarkerHandle>,
}

impl MarkerSynchronizer {
    pub fn new(strategy: SyncStrategy) -> Self {
        Self {
            strategy,
            handles: Vec::new(),
        }
    }

    pub fn strategy(&self) -> SyncStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: SyncStrategy) {
        self.strategy = strategy;
    }

    /// Live handles, in filtered order.
    pub fn handles(&self) -> &[MarkerHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Identifiers of the points currently shown.
    pub fn live_ids(&self) -> Vec<&str> {
        self.handles.iter().map(MarkerHandle::point_id).collect()
    }

    /// The handle showing the point with identifier `id`.
    pub fn handle_for(&self, id: &str) -> Option<&MarkerHandle> {
        self.handles.iter().find(|h| h.point_id() == id)
    }

    /// Bring the live markers in line with `filtered`.
    ///
    /// `bind` creates the activation callback for a newly attached marker.
    pub fn sync<S, F>(&mut self, surface: &mut S, filtered: &[Arc<Point>], bind: F) -> SyncReport
    where
        S: MapSurface + ?Sized,
        F: Fn(&Arc<Point>) -> ActivationCallback,
    {
        let _span = PerfSpan::new("marker_sync");
        let report = match self.strategy {
            SyncStrategy::Rebuild => self.rebuild(surface, filtered, &bind),
            SyncStrategy::Reconcile => self.reconcile(surface, filtered, &bind),
        };
        tracing::debug!(
            target: targets::MAP,
            strategy = ?self.strategy,
            created = report.created,
            released = report.released,
            kept = report.kept,
            hidden = report.hidden,
            duplicates = report.duplicates,
            "markers synchronized"
        );
        report
    }

    /// Release every live marker.
    pub fn release_all<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let released = self.handles.len();
        for handle in self.handles.drain(..) {
            handle.release(surface);
        }
        released
    }

    fn rebuild<S, F>(&mut self, surface: &mut S, filtered: &[Arc<Point>], bind: &F) -> SyncReport
    where
        S: MapSurface + ?Sized,
        F: Fn(&Arc<Point>) -> ActivationCallback,
    {
        let mut report = SyncReport {
            released: self.release_all(surface),
            ..Default::default()
        };

        let mut seen = HashSet::new();
        for point in filtered {
            if !point.has_coordinate() {
                report.hidden += 1;
                continue;
            }
            if !seen.insert(point.id.as_str()) {
                report.duplicates += 1;
                tracing::warn!(
                    target: targets::MAP,
                    id = %point.id,
                    "duplicate point id, marker skipped"
                );
                continue;
            }
            if let Some(handle) = MarkerHandle::attach(surface, point.clone(), bind(point)) {
                self.handles.push(handle);
                report.created += 1;
            }
        }
        report
    }

    fn reconcile<S, F>(&mut self, surface: &mut S, filtered: &[Arc<Point>], bind: &F) -> SyncReport
    where
        S: MapSurface + ?Sized,
        F: Fn(&Arc<Point>) -> ActivationCallback,
    {
        let mut report = SyncReport::default();
        let mut previous: HashMap<String, MarkerHandle> = self
            .handles
            .drain(..)
            .map(|h| (h.point_id().to_string(), h))
            .collect();

        let mut seen = HashSet::new();
        let mut next = Vec::with_capacity(filtered.len());
        for point in filtered {
            if !point.has_coordinate() {
                report.hidden += 1;
                continue;
            }
            if !seen.insert(point.id.as_str()) {
                report.duplicates += 1;
                tracing::warn!(
                    target: targets::MAP,
                    id = %point.id,
                    "duplicate point id, marker skipped"
                );
                continue;
            }
            match previous.remove(&point.id) {
                Some(handle) if handle.is_current_for(point) => {
                    next.push(handle);
                    report.kept += 1;
                    continue;
                }
                Some(stale) => {
                    stale.release(surface);
                    report.released += 1;
                }
                None => {}
            }
            if let Some(handle) = MarkerHandle::attach(surface, point.clone(), bind(point)) {
                next.push(handle);
                report.created += 1;
            }
        }

        for (_, handle) in previous {
            handle.release(surface);
            report.released += 1;
        }
        self.handles = next;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::HeadlessSurface;

    fn point(id: &str, lng: f64) -> Arc<Point> {
        Arc::new(Point::new(id, id).at(lng, 21.0))
    }

    fn noop(_: &Arc<Point>) -> ActivationCallback {
        Arc::new(|| {})
    }

    #[test]
    fn test_rebuild_matches_filtered() {
        let mut surface = HeadlessSurface::new();
        let mut sync = MarkerSynchronizer::new(SyncStrategy::Rebuild);

        let first = vec![point("a", 1.0), point("b", 2.0)];
        sync.sync(&mut surface, &first, noop);
        assert_eq!(sync.live_ids(), vec!["a", "b"]);
        assert_eq!(surface.marker_count(), 2);

        let second = vec![point("b", 2.0), point("c", 3.0)];
        let report = sync.sync(&mut surface, &second, noop);
        assert_eq!(report.released, 2);
        assert_eq!(report.created, 2);
        assert_eq!(sync.live_ids(), vec!["b", "c"]);
        assert_eq!(surface.marker_count(), 2);
    }

    #[test]
    fn test_identical_filters_do_not_duplicate() {
        let mut surface = HeadlessSurface::new();
        let mut sync = MarkerSynchronizer::new(SyncStrategy::Rebuild);
        let filtered = vec![point("a", 1.0), point("b", 2.0)];

        for _ in 0..3 {
            sync.sync(&mut surface, &filtered, noop);
        }
        assert_eq!(surface.marker_count(), 2);
    }

    #[test]
    fn test_hidden_and_duplicate_points_skipped() {
        let mut surface = HeadlessSurface::new();
        let mut sync = MarkerSynchronizer::new(SyncStrategy::Rebuild);
        let filtered = vec![
            point("a", 1.0),
            Arc::new(Point::new("nowhere", "N")),
            point("a", 5.0),
        ];

        let report = sync.sync(&mut surface, &filtered, noop);
        assert_eq!(report.created, 1);
        assert_eq!(report.hidden, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(surface.marker_count(), 1);
    }

    #[test]
    fn test_reconcile_keeps_unchanged() {
        let mut surface = HeadlessSurface::new();
        let mut sync = MarkerSynchronizer::new(SyncStrategy::Reconcile);
        let a = point("a", 1.0);
        let b = point("b", 2.0);

        sync.sync(&mut surface, &[a.clone(), b.clone()], noop);
        let overlay_a = sync.handle_for("a").unwrap().overlay();

        let moved_b = point("b", 9.0);
        let report = sync.sync(&mut surface, &[a.clone(), moved_b, point("c", 3.0)], noop);
        assert_eq!(report.kept, 1);
        assert_eq!(report.released, 1);
        assert_eq!(report.created, 2);
        assert_eq!(sync.handle_for("a").unwrap().overlay(), overlay_a);
        assert_eq!(surface.marker_count(), 3);

        let report = sync.sync(&mut surface, &[], noop);
        assert_eq!(report.released, 3);
        assert_eq!(surface.marker_count(), 0);
    }

    #[test]
    fn test_release_all() {
        let mut surface = HeadlessSurface::new();
        let mut sync = MarkerSynchronizer::default();
        sync.sync(&mut surface, &[point("a", 1.0)], noop);
        assert_eq!(sync.release_all(&mut surface), 1);
        assert!(sync.is_empty());
        assert_eq!(surface.marker_count(), 0);
    }
}
