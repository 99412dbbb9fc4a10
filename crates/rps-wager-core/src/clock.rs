//! Injected logical clock.
//!
//! All timeout arithmetic uses logical clock ticks supplied from
//! outside; the core never reads wall-clock time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A monotonically increasing logical clock.
pub trait Clock: Send + Sync {
    /// Current tick count.
    fn now(&self) -> u64;
}

/// Shared, manually advanced clock.
///
/// Clones observe the same counter, so a service can hand one handle
/// to the engine and keep another to drive ticks. Also used by tests
/// to simulate timeout windows deterministically.
#[derive(Clone, Default)]
pub struct ManualClock {
    ticks: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at tick 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by the given number of ticks
    pub fn advance(&self, ticks: u64) {
        self.ticks.fetch_add(ticks, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}
