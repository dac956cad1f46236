//! Time abstraction enabling deterministic tests.
//!
//! All TTL, expiry, and tick-interval logic is generic over [`Clock`]
//! instead of calling `Instant::now()` directly, so tests can advance time
//! without real sleeps.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A source of monotonic time.
///
/// Production code uses [`SystemClock`]; tests use [`MockClock`], which can
/// be advanced under test control.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Real wall-clock implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Mock clock for deterministic testing.
///
/// Starts at `Instant::now()` and only moves forward when explicitly
/// advanced, so TTL/eviction/tick scenarios never depend on real sleeps.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self { start: Instant::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Advance the clock by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().expect("mock clock lock poisoned");
        *elapsed += duration;
    }

    /// Advance the clock by `millis` milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Pin the clock to a specific elapsed duration since construction.
    pub fn set_elapsed(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().expect("mock clock lock poisoned");
        *elapsed = duration;
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().expect("mock clock lock poisoned")
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }
}
