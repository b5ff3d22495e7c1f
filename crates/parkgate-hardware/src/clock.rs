//! Wall-time-backed monotonic clock.

use crate::traits::Clock;
use std::time::Instant;

/// Monotonic clock backed by [`Instant`], counting milliseconds since
/// construction.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::{Clock, SystemClock};
///
/// let clock = SystemClock::new();
/// let a = clock.now_ms();
/// let b = clock.now_ms();
/// assert!(b >= a);
/// ```
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Create a clock whose zero point is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Instant is monotonic, so this never decreases.
        self.start.elapsed().as_millis() as u64
    }
}
