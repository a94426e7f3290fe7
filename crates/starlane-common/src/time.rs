//! Time source contract.
//!
//! All interval gating in the simulation reads the current timestamp from an
//! injected [`TimeSource`], so tests and fast-forward hosts can advance a
//! simulated clock instead of waiting on wall time.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Monotonic millisecond clock consumed by the simulation.
pub trait TimeSource: Debug + Send + Sync {
    /// Current timestamp in milliseconds. Never decreases.
    fn now_ms(&self) -> u64;
}

/// Host-driven clock. Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock starting at `start_ms`.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Advances the clock by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::Relaxed);
    }

    /// Sets the clock to `ms`. Requests to move backwards are ignored.
    pub fn set(&self, ms: u64) {
        let current = self.now.load(Ordering::Relaxed);
        if ms < current {
            warn!("Ignoring attempt to rewind clock from {current} to {ms}");
            return;
        }
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// Wall-clock time since construction, scaled by a game speed multiplier.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    time_scale: f64,
}

impl MonotonicClock {
    /// Creates a real-time clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_time_scale(1.0)
    }

    /// Creates a clock that runs `scale` times faster than wall time.
    #[must_use]
    pub fn with_time_scale(scale: f64) -> Self {
        Self {
            origin: Instant::now(),
            time_scale: scale.max(0.0),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now_ms(&self) -> u64 {
        let elapsed = self.origin.elapsed().as_secs_f64() * 1000.0;
        (elapsed * self.time_scale) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(0);
        clock.advance(16);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 32);
    }

    #[test]
    fn test_manual_clock_never_rewinds() {
        let clock = ManualClock::new(5_000);
        clock.set(1_000);
        assert_eq!(clock.now_ms(), 5_000);
        clock.set(6_000);
        assert_eq!(clock.now_ms(), 6_000);
    }

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::with_time_scale(10.0);
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
