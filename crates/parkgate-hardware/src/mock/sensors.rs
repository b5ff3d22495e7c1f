//! Mock presence sensors for testing and development.

use crate::traits::PresenceSensors;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mock pair of presence sensors.
///
/// Sensor levels are shared with the handle through atomics, so a test can
/// flip a beam while the controller owns the sensor pair.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::mock::MockPresenceSensors;
/// use parkgate_hardware::PresenceSensors;
///
/// #[tokio::main]
/// async fn main() {
///     let (sensors, handle) = MockPresenceSensors::new();
///
///     assert!(sensors.snapshot().await.both_clear());
///
///     handle.set_entry(true);
///     assert!(sensors.entry_occluded().await);
///     assert!(!sensors.exit_occluded().await);
/// }
/// ```
#[derive(Debug)]
pub struct MockPresenceSensors {
    entry: Arc<AtomicBool>,
    exit: Arc<AtomicBool>,
}

impl MockPresenceSensors {
    /// Create a new sensor pair with both beams clear.
    ///
    /// Returns a tuple of (MockPresenceSensors, MockPresenceSensorsHandle).
    pub fn new() -> (Self, MockPresenceSensorsHandle) {
        let entry = Arc::new(AtomicBool::new(false));
        let exit = Arc::new(AtomicBool::new(false));

        let sensors = Self {
            entry: Arc::clone(&entry),
            exit: Arc::clone(&exit),
        };

        let handle = MockPresenceSensorsHandle { entry, exit };

        (sensors, handle)
    }
}

impl PresenceSensors for MockPresenceSensors {
    async fn entry_occluded(&self) -> bool {
        self.entry.load(Ordering::SeqCst)
    }

    async fn exit_occluded(&self) -> bool {
        self.exit.load(Ordering::SeqCst)
    }
}

/// Handle for driving a mock sensor pair.
#[derive(Debug, Clone)]
pub struct MockPresenceSensorsHandle {
    entry: Arc<AtomicBool>,
    exit: Arc<AtomicBool>,
}

impl MockPresenceSensorsHandle {
    /// Set the entry-side beam state (`true` = occluded).
    pub fn set_entry(&self, occluded: bool) {
        self.entry.store(occluded, Ordering::SeqCst);
    }

    /// Set the exit-side beam state (`true` = occluded).
    pub fn set_exit(&self, occluded: bool) {
        self.exit.store(occluded, Ordering::SeqCst);
    }

    /// Clear both beams.
    pub fn clear_all(&self) {
        self.entry.store(false, Ordering::SeqCst);
        self.exit.store(false, Ordering::SeqCst);
    }

    /// Current entry-side beam state.
    pub fn entry(&self) -> bool {
        self.entry.load(Ordering::SeqCst)
    }

    /// Current exit-side beam state.
    pub fn exit(&self) -> bool {
        self.exit.load(Ordering::SeqCst)
    }
}
