//! Peripheral abstraction layer for the Parkgate barrier controller.
//!
//! This crate provides trait-based abstractions for the peripherals a
//! card-authorized vehicle gate consults: the contactless card reader, the
//! paired presence sensors on either side of the barrier, the barrier
//! actuator, and the status indicators. These traits enable polymorphic
//! behavior and easy substitution between mock implementations (for
//! development and testing) and real hardware drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native
//!   `async fn` in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Poll-oriented**: The controller samples peripherals once per cycle;
//!   no peripheral drives state transitions through callbacks or interrupts.
//! - **Error-aware**: Fallible operations return `Result<T>` with detailed
//!   error information. Sensor reads are infallible booleans by contract.
//!
//! # Device Traits
//!
//! ## Card Reader
//!
//! The [`CardReader`] trait represents the contactless reader at the gate
//! pillar. A read attempt never blocks beyond a small bounded time:
//!
//! ```no_run
//! use parkgate_hardware::CardReader;
//! use parkgate_hardware::Result;
//! use parkgate_core::CardUid;
//!
//! async fn scan_once<R: CardReader>(reader: &mut R) -> Result<Option<CardUid>> {
//!     reader.try_read().await
//! }
//! ```
//!
//! ## Presence Sensors
//!
//! The [`PresenceSensors`] trait exposes the entry-side and exit-side beam
//! sensors. [`PresenceSensors::snapshot`] reads both back-to-back so a poll
//! cycle works from one consistent observation:
//!
//! ```no_run
//! use parkgate_hardware::PresenceSensors;
//!
//! async fn gate_clear<S: PresenceSensors>(sensors: &S) -> bool {
//!     sensors.snapshot().await.both_clear()
//! }
//! ```
//!
//! ## Actuator and Indicators
//!
//! [`BarrierActuator`] accepts open/close commands with no position
//! feedback; the controller waits a fixed travel time after commanding.
//! [`Indicators`] is a pure sink for status text, the free-slot count, and
//! the occupancy LED.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides simulated devices with control handles for
//! driving scenarios programmatically, plus a [`MockClock`](mock::MockClock)
//! for deterministic timeout testing. [`VirtualPanel`] is a virtual LCD +
//! occupancy display implementing [`Indicators`].

pub mod clock;
pub mod error;
pub mod mock;
pub mod panel;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::SystemClock;
pub use error::{HardwareError, Result};
pub use panel::{Alignment, VirtualPanel, VirtualPanelBuilder, align_text, truncate_text};
pub use traits::{BarrierActuator, CardReader, Clock, Indicators, PresenceSensors};
pub use types::{DeviceInfo, LedColor, ReaderInfo, SensorSnapshot};
