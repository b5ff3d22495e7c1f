//! Controller timing and capacity configuration.

use serde::{Deserialize, Serialize};

use parkgate_core::constants::{
    ACTUATOR_TRAVEL_MS, AUTHORIZED_TIMEOUT_MS, DEFAULT_CAPACITY, NOTICE_HOLD_MS,
    PASSAGE_TIMEOUT_MS, POLL_INTERVAL_MS, SETTLE_BEFORE_CLOSING_MS,
};

/// Configuration for the barrier controller.
///
/// All durations are milliseconds on the controller clock. The defaults
/// match the deployed gate timings.
///
/// # Example
///
/// ```
/// use parkgate_controller::ControllerConfig;
///
/// let config = ControllerConfig {
///     capacity: 8,
///     ..ControllerConfig::default()
/// };
/// assert_eq!(config.authorized_timeout_ms, 10_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Number of parking slots behind the gate.
    pub capacity: usize,

    /// How long an accepted card waits for its vehicle before the
    /// authorization is cancelled.
    pub authorized_timeout_ms: u64,

    /// How long the open gate waits for a confirmed passage before falling
    /// back to closing without a registry update.
    pub passage_timeout_ms: u64,

    /// Settle delay between the passage ending and the close command.
    pub settle_before_closing_ms: u64,

    /// Barrier arm travel time, one direction.
    pub actuator_travel_ms: u64,

    /// Interval between polling cycles.
    pub poll_interval_ms: u64,

    /// How long transient panel notices stay up before the state text
    /// is restored.
    pub notice_hold_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            authorized_timeout_ms: AUTHORIZED_TIMEOUT_MS,
            passage_timeout_ms: PASSAGE_TIMEOUT_MS,
            settle_before_closing_ms: SETTLE_BEFORE_CLOSING_MS,
            actuator_travel_ms: ACTUATOR_TRAVEL_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            notice_hold_ms: NOTICE_HOLD_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = ControllerConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.authorized_timeout_ms, 10_000);
        assert_eq!(config.passage_timeout_ms, 15_000);
        assert_eq!(config.settle_before_closing_ms, 2_000);
        assert_eq!(config.actuator_travel_ms, 500);
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.notice_hold_ms, 1_500);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = ControllerConfig {
            capacity: 6,
            ..ControllerConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.capacity, 6);
        assert_eq!(back.passage_timeout_ms, config.passage_timeout_ms);
    }
}
