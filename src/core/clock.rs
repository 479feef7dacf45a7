//! Time source abstraction
//!
//! All lifecycle components read the current instant through the [`Clock`]
//! trait instead of calling `Utc::now()` directly, so lateness and sanction
//! windows can be driven deterministically in tests and during event replay.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source backed by the system clock
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven time source
///
/// Used by the event replay pipeline (each event carries its own timestamp)
/// and by tests that need to place returns precisely inside or outside the
/// grace window.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a manual clock pinned at the given instant
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    /// Move the clock to an absolute instant
    ///
    /// Replay uses this; events are required to be ordered, so the clock
    /// only ever moves forward.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap();
        *now = instant;
    }

    /// Advance the clock by a duration
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
