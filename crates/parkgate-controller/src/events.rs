//! Audit records for confirmed passages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parkgate_core::{CardUid, Intent};

/// Maximum number of passage events kept in memory.
pub const MAX_EVENT_HISTORY: usize = 256;

/// A confirmed vehicle passage.
///
/// Recorded exactly once per passage, at the instant the registry is
/// updated. Wall-clock time is recorded alongside the controller clock so
/// events exported from a live gate carry a real timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageEvent {
    /// Card that operated the gate.
    pub uid: CardUid,

    /// Direction of travel.
    pub direction: Intent,

    /// Controller clock reading at confirmation.
    pub at_ms: u64,

    /// Wall-clock time at confirmation.
    pub timestamp: DateTime<Utc>,

    /// Occupancy after the registry update.
    pub occupied_after: usize,
}

impl PassageEvent {
    /// Create a new event stamped with the current wall-clock time.
    pub fn new(uid: CardUid, direction: Intent, at_ms: u64, occupied_after: usize) -> Self {
        Self {
            uid,
            direction,
            at_ms,
            timestamp: Utc::now(),
            occupied_after,
        }
    }
}
