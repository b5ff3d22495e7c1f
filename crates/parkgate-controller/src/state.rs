//! Gate state machine for the barrier control flow.
//!
//! # States
//!
//! - `Closed`: barrier down, polling the reader
//! - `AuthorizedWaitingVehicle`: card accepted, waiting for the vehicle to
//!   reach the barrier
//! - `Opening`: barrier travelling up
//! - `OpenWaitingPassage`: barrier up, waiting for the vehicle to drive
//!   through
//! - `WaitBeforeClosing`: passage over, settle delay before closing
//! - `Closing`: barrier travelling down
//!
//! # Valid Transitions
//!
//! - Closed → AuthorizedWaitingVehicle
//! - AuthorizedWaitingVehicle → Opening | Closed (authorization timeout)
//! - Opening → OpenWaitingPassage
//! - OpenWaitingPassage → WaitBeforeClosing | Closing (passage timeout
//!   skips the settle delay)
//! - WaitBeforeClosing → Closing
//! - Closing → Closed | Opening (obstruction while closing reopens)
//!
//! Time never blocks here: states that must end record a deadline in
//! clock milliseconds and the control loop compares against `now_ms` on
//! every poll.

use std::fmt;

use serde::{Deserialize, Serialize};

use parkgate_core::constants::{
    MSG_GATE_CLOSED, MSG_GATE_CLOSING, MSG_GATE_OPENING, MSG_PLEASE_PASS, MSG_PROCEED,
    MSG_VEHICLE_PASSED,
};

/// Maximum number of state transitions to keep in history.
///
/// A full entry or exit flow is six transitions, so 120 records cover the
/// last twenty passages, enough to reconstruct recent gate behavior without
/// unbounded growth on a long-running controller.
pub const MAX_HISTORY_SIZE: usize = 120;

/// Phases of the barrier control flow.
///
/// Each state owns a fixed panel text, available via
/// [`status_text`](GateState::status_text), which the control loop pushes to
/// the indicators on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Barrier down, reader polled for cards.
    Closed,

    /// Card accepted; waiting for the vehicle to occlude its approach
    /// sensor before opening. Expires back to `Closed`.
    AuthorizedWaitingVehicle,

    /// Barrier commanded open, actuator still travelling.
    Opening,

    /// Barrier fully open; waiting for the vehicle to drive through.
    /// A confirmed passage settles in `WaitBeforeClosing`; the timeout
    /// expires straight into `Closing` once the gate area is clear.
    OpenWaitingPassage,

    /// Passage over; short settle delay before commanding the close.
    WaitBeforeClosing,

    /// Barrier commanded closed, actuator still travelling. An obstruction
    /// here aborts the close and reopens.
    Closing,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            GateState::Closed => "Closed",
            GateState::AuthorizedWaitingVehicle => "AuthorizedWaitingVehicle",
            GateState::Opening => "Opening",
            GateState::OpenWaitingPassage => "OpenWaitingPassage",
            GateState::WaitBeforeClosing => "WaitBeforeClosing",
            GateState::Closing => "Closing",
        };
        write!(f, "{}", state_str)
    }
}

impl GateState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use parkgate_controller::GateState;
    ///
    /// assert!(GateState::Closed.can_transition_to(&GateState::AuthorizedWaitingVehicle));
    /// assert!(!GateState::Closed.can_transition_to(&GateState::OpenWaitingPassage));
    /// ```
    pub fn can_transition_to(&self, target: &GateState) -> bool {
        matches!(
            (self, target),
            // From Closed
            (GateState::Closed, GateState::AuthorizedWaitingVehicle)
            // From AuthorizedWaitingVehicle
            | (
                GateState::AuthorizedWaitingVehicle,
                GateState::Opening | GateState::Closed
            )
            // From Opening
            | (GateState::Opening, GateState::OpenWaitingPassage)
            // From OpenWaitingPassage
            | (
                GateState::OpenWaitingPassage,
                GateState::WaitBeforeClosing | GateState::Closing
            )
            // From WaitBeforeClosing
            | (GateState::WaitBeforeClosing, GateState::Closing)
            // From Closing
            | (GateState::Closing, GateState::Closed | GateState::Opening)
        )
    }

    /// Panel text shown while this state is active.
    ///
    /// Transient notices (denial, parking full, vehicle passed) override
    /// this text briefly; the loop restores it when the notice expires.
    pub fn status_text(&self) -> &'static str {
        match self {
            GateState::Closed => MSG_GATE_CLOSED,
            GateState::AuthorizedWaitingVehicle => MSG_PROCEED,
            GateState::Opening => MSG_GATE_OPENING,
            GateState::OpenWaitingPassage => MSG_PLEASE_PASS,
            GateState::WaitBeforeClosing => MSG_VEHICLE_PASSED,
            GateState::Closing => MSG_GATE_CLOSING,
        }
    }

    /// Whether the barrier arm is physically up (or travelling up) in this
    /// state.
    pub fn barrier_commanded_open(&self) -> bool {
        matches!(
            self,
            GateState::Opening | GateState::OpenWaitingPassage | GateState::WaitBeforeClosing
        )
    }
}

/// A single recorded state transition.
///
/// Timestamps are controller-clock milliseconds, so records from a test run
/// driven by a mock clock stay deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: GateState,

    /// The state transitioned to.
    pub to: GateState,

    /// Controller clock reading when the transition occurred.
    pub at_ms: u64,
}

impl StateTransition {
    /// Create a new transition record.
    pub fn new(from: GateState, to: GateState, at_ms: u64) -> Self {
        Self { from, to, at_ms }
    }
}
