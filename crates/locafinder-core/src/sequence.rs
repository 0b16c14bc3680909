//! Request sequencing.
//!
//! When several asynchronous requests for the same piece of state can be in
//! flight at once (a new route is requested on every position update, for
//! instance), responses may arrive out of order. A [`RequestSequence`] hands
//! out a monotonically increasing [`RequestToken`] for every request; only a
//! response carrying the most recently issued token may update shared state.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// Identifies one issued request within a [`RequestSequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// The raw sequence number.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues request tokens and answers whether a token is still the latest.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    /// Create a sequence with no tokens issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every token issued before it.
    pub fn next(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestToken(n)),
        }
    }

    /// Whether `token` is the most recently issued token.
    pub fn is_current(&self, token: RequestToken) -> bool {
        let current = self.latest.load(Ordering::SeqCst) == token.0;
        if !current {
            tracing::debug!(target: targets::SEQUENCE, %token, "stale request token");
        }
        current
    }

    /// Supersede every outstanding token without issuing a usable one.
    ///
    /// Responses for requests started before this call are treated as stale.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
