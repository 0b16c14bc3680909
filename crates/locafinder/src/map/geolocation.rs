//! Geolocation watches.
//!
//! The host platform delivers position updates to
//! [`MapController::update_position`](super::MapController::update_position);
//! this module only manages the lifetime of the platform watch. At most one
//! watch is active at a time.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use locafinder_core::logging::targets;

use crate::error::{Error, Result};

/// Identifies a position watch registered with a [`GeolocationProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// A source of position updates.
pub trait GeolocationProvider: Send + Sync {
    /// Start watching the device position.
    ///
    /// Fails with [`Error::GeolocationUnavailable`] when the device has no
    /// position source or the user refused access.
    fn watch_position(&self) -> Result<WatchId>;

    /// Stop a watch. Must be a no-op for an unknown or cleared id.
    fn clear_watch(&self, id: WatchId);
}

/// Holds the single active watch on a provider.
pub struct GeolocationWatch {
    provider: Arc<dyn GeolocationProvider>,
    active: Option<WatchId>,
}

impl GeolocationWatch {
    pub fn new(provider: Arc<dyn GeolocationProvider>) -> Self {
        Self {
            provider,
            active: None,
        }
    }

    /// Start a new watch, cancelling the previous one first.
    pub fn start(&mut self) -> Result<WatchId> {
        self.stop();
        let id = self.provider.watch_position()?;
        tracing::debug!(target: targets::ROUTING, ?id, "position watch started");
        self.active = Some(id);
        Ok(id)
    }

    /// Cancel the active watch. Returns `true` if one was active.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(id) => {
                self.provider.clear_watch(id);
                tracing::debug!(target: targets::ROUTING, ?id, "position watch cleared");
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<WatchId> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl fmt::Debug for GeolocationWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeolocationWatch")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Drop for GeolocationWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A provider driven by the host or by tests.
///
/// Records which watches are open and which were cleared.
#[derive(Debug, Default)]
pub struct SimulatedGeolocation {
    unavailable: Option<String>,
    next_id: AtomicU64,
    open: Mutex<Vec<WatchId>>,
    cleared: Mutex<Vec<WatchId>>,
}

impl SimulatedGeolocation {
    /// A provider that always grants a watch.
    pub fn available() -> Self {
        Self::default()
    }

    /// A provider that always refuses with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Watches currently open.
    pub fn open_watches(&self) -> Vec<WatchId> {
        self.open.lock().clone()
    }

    /// Watches cleared so far, in order.
    pub fn cleared_watches(&self) -> Vec<WatchId> {
        self.cleared.lock().clone()
    }
}

impl GeolocationProvider for SimulatedGeolocation {
    fn watch_position(&self) -> Result<WatchId> {
        if let Some(reason) = &self.unavailable {
            return Err(Error::geolocation(reason.clone()));
        }
        let id = WatchId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.open.lock().push(id);
        Ok(id)
    }

    fn clear_watch(&self, id: WatchId) {
        let mut open = self.open.lock();
        if let Some(index) = open.iter().position(|w| *w == id) {
            open.remove(index);
            self.cleared.lock().push(id);
        }
    }
}
