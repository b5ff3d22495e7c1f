//! Manually advanced clock for deterministic timeout tests.

use crate::traits::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Manually advanced monotonic clock.
///
/// Clones share the same underlying counter, so a test can hold one clone
/// and hand another to the controller, then step time forward without
/// sleeping.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::Clock;
/// use parkgate_hardware::mock::MockClock;
///
/// let clock = MockClock::new();
/// let controller_clock = clock.clone();
///
/// clock.advance(10_000);
/// assert_eq!(controller_clock.now_ms(), 10_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Set the clock to an absolute value.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the new value would move time backwards;
    /// the clock contract is monotonic non-decreasing.
    pub fn set_ms(&self, ms: u64) {
        debug_assert!(
            ms >= self.now.load(Ordering::SeqCst),
            "MockClock must not move backwards"
        );
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_starts_at_zero() {
        let clock = MockClock::new();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new();
        clock.advance(500);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 750);
    }

    #[test]
    fn test_mock_clock_clones_share_time() {
        let clock = MockClock::new();
        let other = clock.clone();

        clock.advance(1_000);
        assert_eq!(other.now_ms(), 1_000);
    }

    #[test]
    fn test_mock_clock_set_ms() {
        let clock = MockClock::new();
        clock.set_ms(42);
        assert_eq!(clock.now_ms(), 42);
    }
}
