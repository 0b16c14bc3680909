//! `tracing` targets and timing spans.
//!
//! Every log statement in the workspace names one of the [`targets`], so
//! hosts can turn subsystems up or down independently:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("locafinder::map=debug,locafinder_net=info")
//!     .init();
//! ```

use std::time::{Duration, Instant};

/// Log targets, one per subsystem.
pub mod targets {
    pub const SIGNAL: &str = "locafinder_core::signal";
    pub const SEQUENCE: &str = "locafinder_core::sequence";
    /// Timings from [`PerfSpan`](super::PerfSpan).
    pub const PERF: &str = "locafinder::perf";

    pub const HTTP: &str = "locafinder_net::http";
    pub const WEBHOOK: &str = "locafinder_net::webhook";
    pub const DIRECTIONS: &str = "locafinder_net::directions";

    pub const STORE: &str = "locafinder::store";
    pub const FILTER: &str = "locafinder::filter";
    /// Map controller, camera and marker synchronization.
    pub const MAP: &str = "locafinder::map";
    pub const SELECTION: &str = "locafinder::selection";
    /// Geolocation watches and route tracking.
    pub const ROUTING: &str = "locafinder::routing";
    pub const ACTIONS: &str = "locafinder::actions";
    pub const CONFIG: &str = "locafinder::config";
}

/// Work on the map thread slower than one 60 Hz frame is reported at `debug`.
pub const SLOW_OPERATION: Duration = Duration::from_millis(16);

/// Guard that enters a `perf` span and logs the elapsed time when dropped.
///
/// Timings go to [`targets::PERF`] at `trace`, or at `debug` when the
/// operation took longer than [`SLOW_OPERATION`].
///
/// ```
/// use locafinder_core::PerfSpan;
///
/// fn sync_markers() {
///     let _span = PerfSpan::new("sync_markers");
///     // ...
/// }
/// ```
#[must_use = "the span ends as soon as the guard is dropped"]
pub struct PerfSpan {
    operation: &'static str,
    started: Instant,
    _entered: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation);
        Self {
            operation,
            started: Instant::now(),
            _entered: span.entered(),
        }
    }

    /// Time since the guard was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        let elapsed_us = elapsed.as_micros() as u64;
        if elapsed > SLOW_OPERATION {
            tracing::debug!(
                target: targets::PERF,
                operation = self.operation,
                elapsed_us,
                "slow operation"
            );
        } else {
            tracing::trace!(
                target: targets::PERF,
                operation = self.operation,
                elapsed_us,
                "operation finished"
            );
        }
    }
}
