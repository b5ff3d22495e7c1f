//! Mock status indicators for testing and development.

use crate::{Result, traits::Indicators, types::LedColor};
use std::sync::{Arc, Mutex};

/// Shared indicator state between mock and handle.
#[derive(Debug)]
struct IndicatorState {
    status_text: String,
    free_slots: usize,
    led: LedColor,
}

/// Mock indicator sink.
///
/// Captures everything the controller pushes so tests can assert on the
/// last status text, free-slot count, and LED color.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::mock::MockIndicators;
/// use parkgate_hardware::{Indicators, LedColor};
///
/// #[tokio::main]
/// async fn main() -> parkgate_hardware::Result<()> {
///     let (mut indicators, handle) = MockIndicators::new();
///
///     indicators.set_status_text("Gate Closed").await?;
///     indicators.set_free_slots(4).await?;
///     indicators.set_occupancy_color(LedColor::Green).await?;
///
///     assert_eq!(handle.status_text(), "Gate Closed");
///     assert_eq!(handle.free_slots(), 4);
///     assert_eq!(handle.led_color(), LedColor::Green);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockIndicators {
    state: Arc<Mutex<IndicatorState>>,
}

impl MockIndicators {
    /// Create a new mock indicator sink.
    ///
    /// Returns a tuple of (MockIndicators, MockIndicatorsHandle).
    pub fn new() -> (Self, MockIndicatorsHandle) {
        let state = Arc::new(Mutex::new(IndicatorState {
            status_text: String::new(),
            free_slots: 0,
            led: LedColor::Off,
        }));

        let indicators = Self {
            state: Arc::clone(&state),
        };

        let handle = MockIndicatorsHandle { state };

        (indicators, handle)
    }
}

impl Indicators for MockIndicators {
    async fn set_status_text(&mut self, text: &str) -> Result<()> {
        // Lock is held only for the assignment; never across an await.
        self.state.lock().expect("indicator state poisoned").status_text = text.to_string();
        Ok(())
    }

    async fn set_free_slots(&mut self, count: usize) -> Result<()> {
        self.state.lock().expect("indicator state poisoned").free_slots = count;
        Ok(())
    }

    async fn set_occupancy_color(&mut self, color: LedColor) -> Result<()> {
        self.state.lock().expect("indicator state poisoned").led = color;
        Ok(())
    }
}

/// Handle for observing mock indicators.
#[derive(Debug, Clone)]
pub struct MockIndicatorsHandle {
    state: Arc<Mutex<IndicatorState>>,
}

impl MockIndicatorsHandle {
    /// Last status text pushed by the controller.
    pub fn status_text(&self) -> String {
        self.state
            .lock()
            .expect("indicator state poisoned")
            .status_text
            .clone()
    }

    /// Last free-slot count pushed by the controller.
    pub fn free_slots(&self) -> usize {
        self.state.lock().expect("indicator state poisoned").free_slots
    }

    /// Last LED color pushed by the controller.
    pub fn led_color(&self) -> LedColor {
        self.state.lock().expect("indicator state poisoned").led
    }
}
