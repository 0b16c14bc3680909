//! The selection controller.
//!
//! Tracks at most one active point. The state machine is
//! `Empty | Active(point)`: activations replace the current point, and
//! dismissal, zoom-to-location or (depending on [`SelectionRetention`]) a
//! filter change that drops the point return it to `Empty`.
//!
//! The controller never touches the map. Camera intents are derived by the
//! map controller from the [`SelectionController::activated`] signal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use locafinder_core::logging::targets;
use locafinder_core::{Property, Signal};

use crate::model::{Point, is_derived_id};

/// Why the selection changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionCause {
    /// A marker's detail control was activated.
    Marker,
    /// An entry in the filtered list was activated.
    List,
    /// The detail view was closed.
    Dismissed,
    /// The selection was consumed by zoom-to-location.
    ZoomToLocation,
    /// The selected point left the filtered set.
    FilteredOut,
    /// The point store was replaced and the selected record changed or
    /// disappeared.
    Reloaded,
}

impl SelectionCause {
    /// Whether entering `Active` for this cause animates the camera.
    pub fn animates_camera(self) -> bool {
        matches!(self, Self::Marker)
    }
}

/// Payload of [`SelectionController::selection_changed`].
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionChange {
    pub previous: Option<Arc<Point>>,
    pub current: Option<Arc<Point>>,
    pub cause: SelectionCause,
}

/// What happens to the selection when the filtered set changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRetention {
    /// Clear the selection when its point is no longer in the filtered set.
    #[default]
    ClearWhenFilteredOut,
    /// Keep the selection regardless of filtering.
    Keep,
}

/// Snapshot of the selection state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionState {
    Empty,
    Active(Arc<Point>),
}

/// Owns the current selection and publishes its changes.
#[derive(Debug)]
pub struct SelectionController {
    current: Property<Option<Arc<Point>>>,
    retention: SelectionRetention,
    /// Emitted whenever the selected point changes.
    pub selection_changed: Signal<SelectionChange>,
    /// Emitted on every activation, including re-activation of the
    /// already selected point.
    pub activated: Signal<(Arc<Point>, SelectionCause)>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(SelectionRetention::default())
    }
}

impl SelectionController {
    pub fn new(retention: SelectionRetention) -> Self {
        Self {
            current: Property::new(None),
            retention,
            selection_changed: Signal::new(),
            activated: Signal::new(),
        }
    }

    pub fn retention(&self) -> SelectionRetention {
        self.retention
    }

    /// Select `point` because its marker was activated.
    pub fn activate_from_marker(&self, point: Arc<Point>) {
        self.activate(point, SelectionCause::Marker);
    }

    /// Select `point` because its list entry was activated.
    pub fn activate_from_list(&self, point: Arc<Point>) {
        self.activate(point, SelectionCause::List);
    }

    /// Close the detail view. Returns `true` if something was selected.
    pub fn dismiss(&self) -> bool {
        self.clear(SelectionCause::Dismissed).is_some()
    }

    /// Consume the selection for zoom-to-location.
    pub fn take_for_zoom(&self) -> Option<Arc<Point>> {
        self.clear(SelectionCause::ZoomToLocation)
    }

    /// Apply the retention policy to a new filtered set.
    ///
    /// Returns `true` if the selection was cleared.
    pub fn retain_within(&self, filtered: &[Arc<Point>]) -> bool {
        if self.retention == SelectionRetention::Keep {
            return false;
        }
        let still_visible = self.current.with(|current| match current {
            Some(selected) => filtered.iter().any(|p| p.id == selected.id),
            None => true,
        });
        !still_visible && self.clear(SelectionCause::FilteredOut).is_some()
    }

    /// Point the selection at the record with the same id in a new snapshot.
    ///
    /// An identical record replaces the held one silently. A changed record
    /// replaces it with a [`SelectionCause::Reloaded`] change. The selection
    /// is cleared when the record is gone, or when it changed and its id was
    /// derived from its position in the snapshot.
    ///
    /// Returns `true` if the selection changed.
    pub fn rebind(&self, points: &[Arc<Point>]) -> bool {
        let Some(selected) = self.current() else {
            return false;
        };
        match points.iter().find(|p| p.id == selected.id) {
            Some(fresh) if Arc::ptr_eq(fresh, &selected) => false,
            Some(fresh) if **fresh == *selected => {
                self.current.set_silent(Some(fresh.clone()));
                false
            }
            Some(fresh) if !is_derived_id(&fresh.id) => {
                tracing::debug!(
                    target: targets::SELECTION,
                    id = %fresh.id,
                    "selection follows reloaded record"
                );
                self.current.set_silent(Some(fresh.clone()));
                self.selection_changed.emit(SelectionChange {
                    previous: Some(selected),
                    current: Some(fresh.clone()),
                    cause: SelectionCause::Reloaded,
                });
                true
            }
            _ => self.clear(SelectionCause::Reloaded).is_some(),
        }
    }

    /// The selected point, if any.
    pub fn current(&self) -> Option<Arc<Point>> {
        self.current.get()
    }

    pub fn is_active(&self) -> bool {
        self.current.with(Option::is_some)
    }

    /// Whether the detail view should be shown. It is visible exactly while a
    /// point is selected.
    pub fn detail_visible(&self) -> bool {
        self.is_active()
    }

    pub fn state(&self) -> SelectionState {
        match self.current() {
            Some(point) => SelectionState::Active(point),
            None => SelectionState::Empty,
        }
    }

    fn activate(&self, point: Arc<Point>, cause: SelectionCause) {
        tracing::debug!(target: targets::SELECTION, id = %point.id, ?cause, "point activated");
        if let Some(previous) = self.current.replace(Some(point.clone())) {
            self.selection_changed.emit(SelectionChange {
                previous,
                current: Some(point.clone()),
                cause,
            });
        }
        self.activated.emit((point, cause));
    }

    fn clear(&self, cause: SelectionCause) -> Option<Arc<Point>> {
        let previous = self.current.take()?;
        tracing::debug!(target: targets::SELECTION, id = %previous.id, ?cause, "selection cleared");
        self.selection_changed.emit(SelectionChange {
            previous: Some(previous.clone()),
            current: None,
            cause,
        });
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn point(id: &str) -> Arc<Point> {
        Arc::new(Point::new(id, id).at(105.0, 21.0))
    }

    #[test]
    fn test_second_activation_replaces_first() {
        let selection = SelectionController::default();
        selection.activate_from_marker(point("x"));
        selection.activate_from_marker(point("y"));

        assert_eq!(selection.current().map(|p| p.id.clone()), Some("y".to_string()));
        assert!(selection.detail_visible());
    }

    #[test]
    fn test_change_signal_carries_old_and_new() {
        let selection = SelectionController::default();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        selection.selection_changed.connect(move |change| {
            sink.lock().push(change.clone());
        });

        selection.activate_from_list(point("x"));
        selection.activate_from_marker(point("y"));
        selection.dismiss();

        let changes = changes.lock();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].previous, None);
        assert_eq!(changes[0].cause, SelectionCause::List);
        assert_eq!(changes[1].previous.as_ref().map(|p| p.id.as_str()), Some("x"));
        assert_eq!(changes[2].current, None);
        assert_eq!(changes[2].cause, SelectionCause::Dismissed);
    }

    #[test]
    fn test_reactivation_signals_without_change() {
        let selection = SelectionController::default();
        let activations = Arc::new(Mutex::new(0));
        let changes = Arc::new(Mutex::new(0));
        let a = activations.clone();
        let c = changes.clone();
        selection.activated.connect(move |_| *a.lock() += 1);
        selection.selection_changed.connect(move |_| *c.lock() += 1);

        let x = point("x");
        selection.activate_from_marker(x.clone());
        selection.activate_from_marker(x);

        assert_eq!(*activations.lock(), 2);
        assert_eq!(*changes.lock(), 1);
    }

    #[test]
    fn test_dismiss_and_zoom_clear() {
        let selection = SelectionController::default();
        assert!(!selection.dismiss());
        assert_eq!(selection.take_for_zoom(), None);

        selection.activate_from_list(point("x"));
        let taken = selection.take_for_zoom();
        assert_eq!(taken.map(|p| p.id.clone()), Some("x".to_string()));
        assert_eq!(selection.state(), SelectionState::Empty);
    }

    #[test]
    fn test_retention_clears_when_filtered_out() {
        let selection = SelectionController::new(SelectionRetention::ClearWhenFilteredOut);
        let x = point("x");
        selection.activate_from_list(x.clone());

        assert!(!selection.retain_within(&[x.clone(), point("y")]));
        assert!(selection.is_active());
        assert!(selection.retain_within(&[point("y")]));
        assert!(!selection.is_active());
    }

    #[test]
    fn test_retention_keep() {
        let selection = SelectionController::new(SelectionRetention::Keep);
        selection.activate_from_list(point("x"));
        assert!(!selection.retain_within(&[]));
        assert!(selection.is_active());
    }

    #[test]
    fn test_rebind_follows_changed_record() {
        let selection = SelectionController::new(SelectionRetention::Keep);
        let causes = Arc::new(Mutex::new(Vec::new()));
        let sink = causes.clone();
        selection
            .selection_changed
            .connect(move |change| sink.lock().push(change.cause));
        selection.activate_from_list(point("x"));

        let moved = Arc::new(Point::new("x", "x").at(107.0, 22.0));
        assert!(selection.rebind(&[point("y"), moved.clone()]));

        assert!(Arc::ptr_eq(&selection.current().unwrap(), &moved));
        assert_eq!(*causes.lock(), vec![SelectionCause::List, SelectionCause::Reloaded]);
    }

    #[test]
    fn test_rebind_clears_missing_or_positional_records() {
        let selection = SelectionController::new(SelectionRetention::Keep);
        selection.activate_from_list(point("x"));
        assert!(selection.rebind(&[point("y")]));
        assert!(!selection.is_active());

        selection.activate_from_list(point("#4"));
        let other = Arc::new(Point::new("#4", "other").at(100.0, 10.0));
        assert!(selection.rebind(&[other]));
        assert!(!selection.is_active());
        assert!(!selection.rebind(&[]));
    }
}
