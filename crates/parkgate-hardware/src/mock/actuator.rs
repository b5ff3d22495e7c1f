//! Mock barrier actuator for testing and development.

use crate::{Result, traits::BarrierActuator, types::DeviceInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock barrier actuator.
///
/// Records the last commanded position and the number of commands issued,
/// observable through the handle while the controller owns the actuator.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::mock::MockBarrierActuator;
/// use parkgate_hardware::BarrierActuator;
///
/// #[tokio::main]
/// async fn main() -> parkgate_hardware::Result<()> {
///     let (mut actuator, handle) = MockBarrierActuator::new();
///     assert!(!handle.is_open());
///
///     actuator.set_open(true).await?;
///     assert!(handle.is_open());
///     assert_eq!(handle.command_count(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockBarrierActuator {
    open: Arc<AtomicBool>,
    commands: Arc<AtomicUsize>,
    name: String,
}

impl MockBarrierActuator {
    /// Create a new mock actuator starting in the closed position.
    ///
    /// Returns a tuple of (MockBarrierActuator, MockBarrierActuatorHandle).
    pub fn new() -> (Self, MockBarrierActuatorHandle) {
        let open = Arc::new(AtomicBool::new(false));
        let commands = Arc::new(AtomicUsize::new(0));

        let actuator = Self {
            open: Arc::clone(&open),
            commands: Arc::clone(&commands),
            name: "Mock Barrier Actuator".to_string(),
        };

        let handle = MockBarrierActuatorHandle { open, commands };

        (actuator, handle)
    }
}

impl BarrierActuator for MockBarrierActuator {
    async fn set_open(&mut self, open: bool) -> Result<()> {
        self.open.store(open, Ordering::SeqCst);
        self.commands.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn device_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock"))
    }
}

/// Handle for observing a mock actuator.
#[derive(Debug, Clone)]
pub struct MockBarrierActuatorHandle {
    open: Arc<AtomicBool>,
    commands: Arc<AtomicUsize>,
}

impl MockBarrierActuatorHandle {
    /// Whether the barrier was last commanded open.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Total number of position commands issued.
    pub fn command_count(&self) -> usize {
        self.commands.load(Ordering::SeqCst)
    }
}
