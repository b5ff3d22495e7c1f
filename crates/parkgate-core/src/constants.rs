//! Core constants for the parking barrier.
//!
//! This module centralizes identifier formats, timing windows, actuator
//! positions, and the status messages shown on the gate panel. The timing
//! values match the deployed gate hardware; changing them alters how long
//! drivers have to reach and pass the barrier.

// ============================================================================
// Identifier Format
// ============================================================================

/// Card UID length in bytes.
///
/// The gate reader delivers fixed 4-byte UIDs (ISO 14443 single-size).
/// All registry and authorization comparisons assume exactly this length.
pub const UID_LENGTH: usize = 4;

// ============================================================================
// Capacity
// ============================================================================

/// Default lot capacity (vehicles inside at once).
///
/// The registry refuses entries beyond this bound; exits are never
/// capacity-checked.
pub const DEFAULT_CAPACITY: usize = 4;

// ============================================================================
// Timing Windows
// ============================================================================

/// How long an authorized driver has to reach the presence sensor (milliseconds).
///
/// Measured from the card scan. If no vehicle trips the matching sensor
/// within this window the request is silently cancelled and the gate
/// returns to accepting scans.
///
/// # Value: 10000ms (10 seconds)
pub const AUTHORIZED_TIMEOUT_MS: u64 = 10_000;

/// How long a vehicle has to pass through the open gate (milliseconds).
///
/// Measured from the barrier reaching the open position. After this window
/// the gate closes as soon as both sensors read clear, without confirming
/// the passage or touching the registry.
///
/// # Value: 15000ms (15 seconds)
pub const PASSAGE_TIMEOUT_MS: u64 = 15_000;

/// Settle delay between a confirmed passage and the close command (milliseconds).
///
/// Gives the vehicle room to fully clear the barrier arc before closing
/// begins.
///
/// # Value: 2000ms (2 seconds)
pub const SETTLE_BEFORE_CLOSING_MS: u64 = 2_000;

/// Barrier actuator travel time (milliseconds).
///
/// The actuator has no position feedback; the controller waits this long
/// after commanding a move before assuming the barrier has arrived.
///
/// # Value: 500ms
pub const ACTUATOR_TRAVEL_MS: u64 = 500;

/// Minimum delay between poll cycles (milliseconds).
///
/// A duty-cycle limiter, not a correctness mechanism: it bounds how often
/// the reader and sensors are sampled.
///
/// # Value: 50ms
pub const POLL_INTERVAL_MS: u64 = 50;

/// How long a transient notice stays on the panel (milliseconds).
///
/// Applies to the "Access Denied!" and "Parking is full!" messages. Polling
/// continues while the notice is held; only the status line is pinned.
///
/// # Value: 1500ms
pub const NOTICE_HOLD_MS: u64 = 1_500;

// ============================================================================
// Actuator Positions
// ============================================================================

/// Servo angle for the fully closed barrier (degrees).
pub const BARRIER_CLOSED_ANGLE: f32 = 0.0;

/// Servo angle for the fully open barrier (degrees).
pub const BARRIER_OPEN_ANGLE: f32 = 75.0;

// ============================================================================
// Panel Configuration
// ============================================================================

/// Number of lines on the gate status panel.
pub const PANEL_LINES: usize = 2;

/// Number of characters per panel line.
pub const PANEL_COLUMNS: usize = 16;

// ============================================================================
// Status Messages
// ============================================================================

/// Shown while the gate is shut and accepting card scans.
pub const MSG_GATE_CLOSED: &str = "Gate Closed";

/// Shown after a successful authorization, while waiting for the vehicle.
pub const MSG_PROCEED: &str = "Proceed to gate";

/// Shown while the barrier travels to the open position.
pub const MSG_GATE_OPENING: &str = "Gate Opening...";

/// Shown while waiting for the vehicle to pass completely.
pub const MSG_PLEASE_PASS: &str = "Please pass...";

/// Shown during the settle delay after a confirmed passage.
pub const MSG_VEHICLE_PASSED: &str = "Vehicle passed!";

/// Shown while the barrier travels to the closed position.
pub const MSG_GATE_CLOSING: &str = "Gate Closing...";

/// Transient notice for an unauthorized card.
pub const MSG_ACCESS_DENIED: &str = "Access Denied!";

/// Transient notice for an authorized entry attempt while the lot is full.
pub const MSG_PARKING_FULL: &str = "Parking is full!";
