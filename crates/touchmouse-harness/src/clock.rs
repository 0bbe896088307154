#![forbid(unsafe_code)]

//! Deterministic time for gesture scripts.
//!
//! Events and frame ticks take their timestamps from a [`ManualClock`] that
//! only moves when the script says so. Tap-delay tests then never depend on
//! how fast the test machine is.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use web_time::Instant;

/// A clock that advances only on request.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    elapsed_us: AtomicU64,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Start a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed_us: AtomicU64::new(0),
        }
    }

    /// The current scripted instant.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.start + Duration::from_micros(self.elapsed_us.load(Ordering::Acquire))
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let us = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        self.elapsed_us.fetch_add(us, Ordering::AcqRel);
    }

    /// Time since the clock started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_us.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_moves_when_advanced() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        assert_eq!(clock.now(), t0);
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now() - t0, Duration::from_millis(16));
        assert_eq!(clock.elapsed(), Duration::from_millis(16));
    }
}
