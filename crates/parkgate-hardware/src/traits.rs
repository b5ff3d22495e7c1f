//! Peripheral trait definitions.
//!
//! This module defines the trait interfaces between the barrier controller
//! and its peripherals. These traits establish the contract the controller
//! depends on, enabling polymorphic behavior and easy substitution between
//! mock and real hardware implementations.
//!
//! All I/O traits use native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT), eliminating the need for the `async_trait` macro. They are NOT
//! object-safe; consume them through generic type parameters.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{DeviceInfo, LedColor, ReaderInfo, SensorSnapshot};
use parkgate_core::CardUid;

/// Monotonic millisecond clock.
///
/// The controller only reads elapsed time; it never resets or adjusts the
/// clock. All timeout checks are of the form
/// `now_ms >= recorded_timestamp + timeout`; the bound is inclusive, so a
/// deadline fires on the exact tick it lands on.
///
/// Implementations must be monotonically non-decreasing. See
/// [`SystemClock`](crate::clock::SystemClock) for the wall-time-backed
/// implementation and [`MockClock`](crate::mock::MockClock) for a manually
/// advanced test clock.
pub trait Clock: Send + Sync {
    /// Current monotonic time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Contactless card reader at the gate pillar.
///
/// # Examples
///
/// ```no_run
/// use parkgate_hardware::{CardReader, Result};
/// use parkgate_core::CardUid;
///
/// async fn poll_reader<R: CardReader>(reader: &mut R) -> Result<Option<CardUid>> {
///     reader.try_read().await
/// }
/// ```
pub trait CardReader: Send + Sync {
    /// Attempt a single card read.
    ///
    /// Returns `Ok(None)` when no card is in the reader field. Must not
    /// block longer than a small bounded time; the controller calls this
    /// once per poll cycle.
    ///
    /// # Errors
    ///
    /// Returns an error on communication failure with the reader. The
    /// controller treats read errors identically to "no card present".
    async fn try_read(&mut self) -> Result<Option<CardUid>>;

    /// Get reader metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// reader information.
    async fn reader_info(&self) -> Result<ReaderInfo>;
}

/// Paired presence sensors on either side of the barrier.
///
/// Readings are instantaneous booleans with no debounce guarantee from the
/// controller's perspective; debounce, if any, is the sensor collaborator's
/// responsibility.
pub trait PresenceSensors: Send + Sync {
    /// Whether the entry-side sensor is currently occluded.
    async fn entry_occluded(&self) -> bool;

    /// Whether the exit-side sensor is currently occluded.
    async fn exit_occluded(&self) -> bool;

    /// Read both sensors back-to-back as one atomic observation.
    ///
    /// The controller takes exactly one snapshot per poll cycle and uses it
    /// consistently for that cycle's decision logic.
    async fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot::new(self.entry_occluded().await, self.exit_occluded().await)
    }
}

/// Barrier actuator (servo or motor driving the physical arm).
///
/// There is no position feedback channel: after commanding a move the
/// controller waits a fixed travel time before assuming completion.
pub trait BarrierActuator: Send + Sync {
    /// Command the barrier open (`true`) or closed (`false`).
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be issued. The controller
    /// logs and retries on the next cycle; actuator faults are never fatal.
    async fn set_open(&mut self, open: bool) -> Result<()>;

    /// Get actuator metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn device_info(&self) -> Result<DeviceInfo>;
}

/// Gate status indicators: panel text, free-slot counter, occupancy LED.
///
/// Pure sinks with no feedback. The controller invokes these fire-and-forget
/// and discards failures.
pub trait Indicators: Send + Sync {
    /// Set the status line shown to the driver.
    ///
    /// # Errors
    ///
    /// Returns an error on communication failure; callers are expected to
    /// discard it.
    async fn set_status_text(&mut self, text: &str) -> Result<()>;

    /// Set the displayed free-slot count.
    ///
    /// # Errors
    ///
    /// Returns an error on communication failure; callers are expected to
    /// discard it.
    async fn set_free_slots(&mut self, count: usize) -> Result<()>;

    /// Set the occupancy LED color.
    ///
    /// # Errors
    ///
    /// Returns an error on communication failure; callers are expected to
    /// discard it.
    async fn set_occupancy_color(&mut self, color: LedColor) -> Result<()>;
}
