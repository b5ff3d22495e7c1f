//! Mock device implementations for testing and development.
//!
//! This module provides simulated peripherals that can be controlled
//! programmatically without requiring physical hardware, plus a manually
//! advanced clock for deterministic timeout tests.

pub mod actuator;
pub mod clock;
pub mod indicators;
pub mod reader;
pub mod sensors;

// Re-export commonly used types
pub use actuator::{MockBarrierActuator, MockBarrierActuatorHandle};
pub use clock::MockClock;
pub use indicators::{MockIndicators, MockIndicatorsHandle};
pub use reader::{MockCardReader, MockCardReaderHandle};
pub use sensors::{MockPresenceSensors, MockPresenceSensorsHandle};
