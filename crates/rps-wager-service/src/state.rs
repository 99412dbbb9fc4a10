//! Application state management.

use rps_wager_core::{GameEngine, ManualClock};
use std::sync::{Arc, Mutex};

/// Shared application state.
///
/// The mutex is the serializing executor: each request holds it for
/// the full duration of its operation, so no request ever observes a
/// partially-applied mutation of another. The guard releases on every
/// exit path.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<GameEngine<ManualClock>>>,
    /// Handle to the same logical clock the engine reads
    clock: ManualClock,
}

impl AppState {
    /// Create state with the given timeout threshold (in clock ticks)
    pub fn new(period_length: u64) -> Self {
        let clock = ManualClock::new();
        Self {
            engine: Arc::new(Mutex::new(GameEngine::new(clock.clone(), period_length))),
            clock,
        }
    }

    /// Run an operation against the engine while holding the lock
    pub fn with_engine<T>(&self, f: impl FnOnce(&mut GameEngine<ManualClock>) -> T) -> T {
        let mut engine = self.engine.lock().unwrap();
        f(&mut engine)
    }

    /// Advance the logical clock and return the new tick count
    pub fn advance_clock(&self, ticks: u64) -> u64 {
        self.clock.advance(ticks);
        self.now()
    }

    /// Current logical clock value
    pub fn now(&self) -> u64 {
        use rps_wager_core::Clock;
        self.clock.now()
    }
}
