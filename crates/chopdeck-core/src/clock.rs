//! Monotonic time source for gesture timing
//!
//! The chop state machine measures hold durations and schedules deferred
//! flips against a monotonic millisecond clock. The clock is injected so
//! hosts use real time while tests drive scenarios deterministically.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin; never decreases
    fn now_ms(&self) -> f64;
}

/// System clock backed by `std::time::Instant`
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock anchored at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced clock for deterministic tests and offline drivers
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<f64>,
}

impl ManualClock {
    /// Create a manual clock at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `delta_ms` (must be non-negative)
    pub fn advance(&self, delta_ms: f64) {
        debug_assert!(delta_ms >= 0.0, "manual clock cannot run backwards");
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }

    /// Jump the clock to an absolute time (must not go backwards)
    pub fn set(&self, now_ms: f64) {
        debug_assert!(now_ms >= self.now_ms.get(), "manual clock cannot run backwards");
        self.now_ms.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}
