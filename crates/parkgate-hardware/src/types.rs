//! Common types shared across peripheral implementations.
//!
//! This module defines types used by multiple device traits, such as device
//! information, LED colors, and the per-cycle sensor snapshot.

use parkgate_core::Intent;
use serde::{Deserialize, Serialize};

/// Generic device information.
///
/// Contains metadata about a peripheral such as name, model, serial number,
/// and firmware version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "MockActuator", "Gate servo").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional device serial number.
    pub serial_number: Option<String>,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            serial_number: None,
            firmware_version: None,
        }
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Card reader information.
///
/// Contains reader-specific metadata such as supported protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "RC522 Gate Reader").
    pub name: String,

    /// List of supported protocols (e.g., ["ISO14443A"]).
    pub protocols: Vec<String>,
}

impl ReaderInfo {
    /// Create a new ReaderInfo.
    pub fn new(name: impl Into<String>, protocols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            protocols,
        }
    }
}

/// LED colors for the occupancy indicator.
///
/// The gate's occupancy light signals lot availability to approaching
/// drivers: green when empty, blue when slots remain, red when full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LedColor {
    /// LED off.
    Off,

    /// Red LED (lot full).
    Red,

    /// Green LED (lot empty).
    Green,

    /// Blue LED (slots available).
    Blue,

    /// Custom RGB color (red, green, blue).
    Custom(u8, u8, u8),
}

impl LedColor {
    /// Create a custom RGB LED color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Custom(r, g, b)
    }

    /// Get the RGB components of the LED color.
    pub fn as_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Off => (0, 0, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::Custom(r, g, b) => (*r, *g, *b),
        }
    }
}

/// One consistent observation of both presence sensors.
///
/// Both sides are read back-to-back and treated as a single atomic
/// observation for the remainder of the poll cycle; the controller never
/// re-reads a sensor mid-decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Entry-side sensor is occluded.
    pub entry: bool,

    /// Exit-side sensor is occluded.
    pub exit: bool,
}

impl SensorSnapshot {
    /// Create a snapshot from raw readings.
    #[must_use]
    pub fn new(entry: bool, exit: bool) -> Self {
        Self { entry, exit }
    }

    /// Both sensors read clear in this observation.
    #[inline]
    #[must_use]
    pub fn both_clear(&self) -> bool {
        !self.entry && !self.exit
    }

    /// At least one sensor is occluded.
    #[inline]
    #[must_use]
    pub fn any_occluded(&self) -> bool {
        self.entry || self.exit
    }

    /// Whether the sensor on the side matching `intent` is occluded.
    ///
    /// Entry intent looks at the entry-side sensor, exit intent at the
    /// exit-side sensor. Returns `false` for [`Intent::None`].
    #[must_use]
    pub fn side_occluded(&self, intent: Intent) -> bool {
        match intent {
            Intent::Entry => self.entry,
            Intent::Exit => self.exit,
            Intent::None => false,
        }
    }
}
