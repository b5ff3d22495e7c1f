//! Barrier gate control logic for parkgate.
//!
//! This crate contains the control loop for a single card-operated parking
//! barrier: the gate state machine, the bounded registry of vehicles inside,
//! and the static authorization list. Peripherals are consumed through the
//! traits in `parkgate-hardware`, so the same controller drives real devices
//! and the mock rig used in tests.

pub mod authorized;
pub mod config;
pub mod controller;
pub mod events;
pub mod registry;
pub mod state;

pub use authorized::AuthorizationList;
pub use config::ControllerConfig;
pub use controller::BarrierController;
pub use events::{MAX_EVENT_HISTORY, PassageEvent};
pub use registry::VehicleRegistry;
pub use state::{GateState, MAX_HISTORY_SIZE, StateTransition};
