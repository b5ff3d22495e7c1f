//! Barrier control loop.
//!
//! The controller owns every peripheral and runs a single polling loop: one
//! sensor snapshot per cycle, one state dispatch, no blocking waits. Every
//! timed behavior is a recorded deadline compared against the clock on the
//! next cycle, so the loop keeps servicing sensors while the barrier arm
//! travels or a settle delay runs down.
//!
//! # Passage confirmation
//!
//! A passage is confirmed in two stages: first the vehicle must occlude the
//! sensor on its approach side while the gate is open (arming), then both
//! sensors must read clear again (confirmation). Only at that instant does
//! the registry change. A vehicle that triggers neither stage before the
//! passage timeout leaves the registry untouched.
//!
//! # Safety interlock
//!
//! The close command is never issued, and never left standing, while either
//! sensor is occluded. An obstruction detected during closing travel aborts
//! the close and reopens the barrier.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, info, warn};

use parkgate_core::{CardUid, Error, Intent, Result};
use parkgate_hardware::{
    BarrierActuator, CardReader, Clock, Indicators, LedColor, PresenceSensors, SensorSnapshot,
};

use crate::authorized::AuthorizationList;
use crate::config::ControllerConfig;
use crate::events::{MAX_EVENT_HISTORY, PassageEvent};
use crate::registry::VehicleRegistry;
use crate::state::{GateState, MAX_HISTORY_SIZE, StateTransition};

/// The card currently driving the gate flow.
#[derive(Debug, Clone, Copy)]
struct PendingPassage {
    uid: CardUid,
    intent: Intent,
}

/// Single-gate barrier controller.
///
/// Generic over the peripheral traits so the same control logic runs against
/// real hardware and against the mock devices in tests. The controller is
/// not thread-safe; it is designed to be driven by one task.
///
/// # Examples
///
/// ```no_run
/// use parkgate_controller::{AuthorizationList, BarrierController, ControllerConfig};
/// use parkgate_hardware::VirtualPanel;
/// use parkgate_hardware::mock::{
///     MockBarrierActuator, MockCardReader, MockClock, MockPresenceSensors,
/// };
/// use parkgate_core::CardUid;
///
/// # async fn example() -> parkgate_core::Result<()> {
/// let (reader, _reader_handle) = MockCardReader::new();
/// let (sensors, _sensor_handle) = MockPresenceSensors::new();
/// let (actuator, _actuator_handle) = MockBarrierActuator::new();
///
/// let authorized = AuthorizationList::from_uids(vec![CardUid::new([1, 2, 3, 4])]);
/// let mut controller = BarrierController::new(
///     MockClock::new(),
///     reader,
///     sensors,
///     actuator,
///     VirtualPanel::default(),
///     authorized,
///     ControllerConfig::default(),
/// );
///
/// controller.run().await
/// # }
/// ```
pub struct BarrierController<C, R, S, A, I>
where
    C: Clock,
    R: CardReader,
    S: PresenceSensors,
    A: BarrierActuator,
    I: Indicators,
{
    clock: C,
    reader: R,
    sensors: S,
    actuator: A,
    indicators: I,

    registry: VehicleRegistry,
    authorized: AuthorizationList,
    config: ControllerConfig,

    state: GateState,
    /// Deadline for the current state, when it has one.
    deadline: Option<u64>,
    pending: Option<PendingPassage>,
    /// Stage one of passage confirmation has fired.
    passage_armed: bool,
    /// While set, a transient notice owns the panel text.
    notice_until: Option<u64>,

    history: VecDeque<StateTransition>,
    events: VecDeque<PassageEvent>,
}

impl<C, R, S, A, I> BarrierController<C, R, S, A, I>
where
    C: Clock,
    R: CardReader,
    S: PresenceSensors,
    A: BarrierActuator,
    I: Indicators,
{
    /// Create a controller in the `Closed` state with an empty registry.
    pub fn new(
        clock: C,
        reader: R,
        sensors: S,
        actuator: A,
        indicators: I,
        authorized: AuthorizationList,
        config: ControllerConfig,
    ) -> Self {
        let registry = VehicleRegistry::new(config.capacity);
        Self {
            clock,
            reader,
            sensors,
            actuator,
            indicators,
            registry,
            authorized,
            config,
            state: GateState::Closed,
            deadline: None,
            pending: None,
            passage_armed: false,
            notice_until: None,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
            events: VecDeque::new(),
        }
    }

    /// Current gate state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Vehicles currently inside.
    pub fn registry(&self) -> &VehicleRegistry {
        &self.registry
    }

    /// Recent state transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Recent confirmed passages, oldest first.
    pub fn events(&self) -> &VecDeque<PassageEvent> {
        &self.events
    }

    /// Push the initial panel text and occupancy indicators.
    pub async fn initialize(&mut self) {
        self.push_status(self.state.status_text()).await;
        self.push_occupancy().await;
    }

    /// Run the polling loop until the task is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error only on an internal state machine violation, which
    /// indicates a bug rather than a recoverable peripheral condition.
    pub async fn run(&mut self) -> Result<()> {
        self.initialize().await;
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            self.poll().await?;
            tokio::time::sleep(interval).await;
        }
    }

    /// Execute one polling cycle.
    ///
    /// Reads the clock and both sensors exactly once, then acts on the
    /// current state. Returns the state after the cycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] if the dispatch attempts an
    /// illegal transition; peripheral failures are logged and retried, never
    /// propagated.
    pub async fn poll(&mut self) -> Result<GateState> {
        let now = self.clock.now_ms();
        let snapshot = self.sensors.snapshot().await;

        self.expire_notice(now).await;

        match self.state {
            GateState::Closed => self.poll_closed(now).await?,
            GateState::AuthorizedWaitingVehicle => self.poll_authorized(now, snapshot).await?,
            GateState::Opening => self.poll_opening(now).await?,
            GateState::OpenWaitingPassage => self.poll_open_waiting(now, snapshot).await?,
            GateState::WaitBeforeClosing => self.poll_wait_before_closing(now, snapshot).await?,
            GateState::Closing => self.poll_closing(now, snapshot).await?,
        }

        Ok(self.state)
    }

    /// Closed: poll the reader and start a flow on an accepted card.
    async fn poll_closed(&mut self, now: u64) -> Result<()> {
        let uid = match self.reader.try_read().await {
            Ok(Some(uid)) => uid,
            Ok(None) => return Ok(()),
            Err(error) => {
                // A reader fault on one cycle is indistinguishable from an
                // empty field; the next cycle retries.
                debug!(%error, "reader fault, treating as no card");
                return Ok(());
            }
        };

        if !self.authorized.is_authorized(&uid) {
            warn!(uid = %uid, "access denied: card not authorized");
            self.set_notice(parkgate_core::constants::MSG_ACCESS_DENIED, now)
                .await;
            return Ok(());
        }

        // Membership decides direction: a card that is inside is leaving.
        let intent = if self.registry.contains(&uid) {
            Intent::Exit
        } else {
            Intent::Entry
        };

        if intent.is_entry() && self.registry.is_full() {
            warn!(
                uid = %uid,
                occupied = self.registry.len(),
                "entry refused: parking full"
            );
            self.set_notice(parkgate_core::constants::MSG_PARKING_FULL, now)
                .await;
            return Ok(());
        }

        info!(uid = %uid, %intent, "card accepted, waiting for vehicle");
        self.pending = Some(PendingPassage { uid, intent });
        self.transition_to(GateState::AuthorizedWaitingVehicle, now)
            .await?;
        self.deadline = Some(now + self.config.authorized_timeout_ms);
        Ok(())
    }

    /// AuthorizedWaitingVehicle: open when the vehicle arrives on the
    /// matching side, or cancel when the authorization expires.
    async fn poll_authorized(&mut self, now: u64, snapshot: SensorSnapshot) -> Result<()> {
        let intent = self.pending.map(|p| p.intent).unwrap_or_default();

        if snapshot.side_occluded(intent) {
            if !self.command_barrier(true).await {
                return Ok(());
            }
            self.transition_to(GateState::Opening, now).await?;
            self.deadline = Some(now + self.config.actuator_travel_ms);
            return Ok(());
        }

        if self.deadline_passed(now) {
            info!(%intent, "authorization expired, no vehicle arrived");
            self.pending = None;
            self.transition_to(GateState::Closed, now).await?;
            self.deadline = None;
        }
        Ok(())
    }

    /// Opening: wait out the actuator travel.
    async fn poll_opening(&mut self, now: u64) -> Result<()> {
        if self.deadline_passed(now) {
            self.passage_armed = false;
            self.transition_to(GateState::OpenWaitingPassage, now).await?;
            self.deadline = Some(now + self.config.passage_timeout_ms);
        }
        Ok(())
    }

    /// OpenWaitingPassage: arm on matching-side occlusion, confirm on both
    /// sensors clear, or fall back to closing on timeout.
    async fn poll_open_waiting(&mut self, now: u64, snapshot: SensorSnapshot) -> Result<()> {
        let intent = self.pending.map(|p| p.intent).unwrap_or_default();

        if !self.passage_armed && snapshot.side_occluded(intent) {
            debug!(%intent, "vehicle under the gate, passage armed");
            self.passage_armed = true;
        }

        if self.passage_armed && snapshot.both_clear() {
            if !self.confirm_passage(now).await {
                return Ok(());
            }
            self.transition_to(GateState::WaitBeforeClosing, now).await?;
            self.deadline = Some(now + self.config.settle_before_closing_ms);
            return Ok(());
        }

        // Fallback only fires with both sensors clear; an occluded gate
        // area keeps the barrier open past the timeout. No passage was
        // confirmed, so the settle state is skipped and the gate closes
        // at once.
        if self.deadline_passed(now) && snapshot.both_clear() {
            warn!(%intent, "passage timeout, closing without registry update");
            self.pending = None;
            self.passage_armed = false;
            if !self.command_barrier(false).await {
                return Ok(());
            }
            self.transition_to(GateState::Closing, now).await?;
            self.deadline = Some(now + self.config.actuator_travel_ms);
        }
        Ok(())
    }

    /// WaitBeforeClosing: let the settle delay run down, then command the
    /// close if the gate area is still clear.
    async fn poll_wait_before_closing(&mut self, now: u64, snapshot: SensorSnapshot) -> Result<()> {
        if !self.deadline_passed(now) {
            return Ok(());
        }

        if snapshot.any_occluded() {
            debug!("gate area occupied, postponing close");
            self.deadline = Some(now + self.config.settle_before_closing_ms);
            return Ok(());
        }

        if !self.command_barrier(false).await {
            return Ok(());
        }
        self.transition_to(GateState::Closing, now).await?;
        self.deadline = Some(now + self.config.actuator_travel_ms);
        Ok(())
    }

    /// Closing: abort and reopen on obstruction, otherwise finish the
    /// travel and return to `Closed`.
    async fn poll_closing(&mut self, now: u64, snapshot: SensorSnapshot) -> Result<()> {
        if snapshot.any_occluded() {
            warn!("obstruction while closing, reopening");
            if !self.command_barrier(true).await {
                return Ok(());
            }
            self.transition_to(GateState::Opening, now).await?;
            self.deadline = Some(now + self.config.actuator_travel_ms);
            return Ok(());
        }

        if self.deadline_passed(now) {
            self.transition_to(GateState::Closed, now).await?;
            self.deadline = None;
            self.push_occupancy().await;
        }
        Ok(())
    }

    /// Apply the registry mutation for a confirmed passage and record it.
    ///
    /// Returns `false` when an entry could not be added because the lot
    /// has no free slot; the pending card and armed flag are kept, the
    /// gate stays open, and the next cycle retries until a slot frees or
    /// the passage timeout closes the gate without a registry update.
    async fn confirm_passage(&mut self, now: u64) -> bool {
        let Some(pending) = self.pending else {
            return true;
        };

        match pending.intent {
            Intent::Entry => {
                if !self.registry.try_add(pending.uid) {
                    // Guard branch: capacity is checked at scan time and
                    // nothing else mutates the registry mid-flow.
                    warn!(
                        uid = %pending.uid,
                        occupied = self.registry.len(),
                        "no slot for a confirmed entry, holding the gate open"
                    );
                    return false;
                }
            }
            Intent::Exit => {
                if !self.registry.remove(&pending.uid) {
                    warn!(uid = %pending.uid, "exit card was not in the registry");
                }
            }
            Intent::None => {}
        }

        self.pending = None;
        self.passage_armed = false;

        info!(
            uid = %pending.uid,
            intent = %pending.intent,
            occupied = self.registry.len(),
            "vehicle passed"
        );

        let event = PassageEvent::new(pending.uid, pending.intent, now, self.registry.len());
        self.events.push_back(event);
        if self.events.len() > MAX_EVENT_HISTORY {
            self.events.pop_front();
        }

        self.set_notice(parkgate_core::constants::MSG_VEHICLE_PASSED, now)
            .await;
        self.push_occupancy().await;
        true
    }

    /// Validate and record a state change, pushing the new state text
    /// unless a notice currently owns the panel.
    async fn transition_to(&mut self, new_state: GateState, now: u64) -> Result<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        debug!(from = %self.state, to = %new_state, at_ms = now, "state transition");
        self.history
            .push_back(StateTransition::new(self.state, new_state, now));
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        self.state = new_state;

        if self.notice_until.is_none() {
            self.push_status(new_state.status_text()).await;
        }
        Ok(())
    }

    /// Inclusive bound: a deadline fires on the exact tick it lands on.
    fn deadline_passed(&self, now: u64) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Command the barrier arm. Returns `false` on failure; the caller
    /// stays in its state and the next cycle retries.
    async fn command_barrier(&mut self, open: bool) -> bool {
        match self.actuator.set_open(open).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, open, "actuator command failed, retrying next cycle");
                false
            }
        }
    }

    /// Show a transient notice, restored to the state text after the hold.
    async fn set_notice(&mut self, text: &str, now: u64) {
        self.notice_until = Some(now + self.config.notice_hold_ms);
        self.push_status(text).await;
    }

    async fn expire_notice(&mut self, now: u64) {
        if self.notice_until.is_some_and(|until| now >= until) {
            self.notice_until = None;
            self.push_status(self.state.status_text()).await;
        }
    }

    /// Indicator pushes are fire-and-forget: a dead panel must not stop
    /// the gate.
    async fn push_status(&mut self, text: &str) {
        if let Err(error) = self.indicators.set_status_text(text).await {
            warn!(%error, "status text update failed");
        }
    }

    async fn push_occupancy(&mut self) {
        let free = self.registry.free_slots();
        let color = if self.registry.is_empty() {
            LedColor::Green
        } else if self.registry.is_full() {
            LedColor::Red
        } else {
            LedColor::Blue
        };

        if let Err(error) = self.indicators.set_free_slots(free).await {
            warn!(%error, "free slot update failed");
        }
        if let Err(error) = self.indicators.set_occupancy_color(color).await {
            warn!(%error, "occupancy color update failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkgate_hardware::mock::{
        MockBarrierActuator, MockBarrierActuatorHandle, MockCardReader, MockCardReaderHandle,
        MockClock, MockIndicators, MockIndicatorsHandle, MockPresenceSensors,
        MockPresenceSensorsHandle,
    };

    type TestController = BarrierController<
        MockClock,
        MockCardReader,
        MockPresenceSensors,
        MockBarrierActuator,
        MockIndicators,
    >;

    struct Rig {
        clock: MockClock,
        reader: MockCardReaderHandle,
        sensors: MockPresenceSensorsHandle,
        actuator: MockBarrierActuatorHandle,
        indicators: MockIndicatorsHandle,
    }

    fn uid(n: u8) -> CardUid {
        CardUid::new([n, n, n, n])
    }

    async fn build(authorized: Vec<CardUid>) -> (TestController, Rig) {
        let clock = MockClock::new();
        let (reader, reader_handle) = MockCardReader::new();
        let (sensors, sensor_handle) = MockPresenceSensors::new();
        let (actuator, actuator_handle) = MockBarrierActuator::new();
        let (indicators, indicator_handle) = MockIndicators::new();

        let mut controller = BarrierController::new(
            clock.clone(),
            reader,
            sensors,
            actuator,
            indicators,
            AuthorizationList::from_uids(authorized),
            ControllerConfig::default(),
        );
        controller.initialize().await;

        (
            controller,
            Rig {
                clock,
                reader: reader_handle,
                sensors: sensor_handle,
                actuator: actuator_handle,
                indicators: indicator_handle,
            },
        )
    }

    #[tokio::test]
    async fn test_starts_closed_with_idle_indicators() {
        let (controller, rig) = build(vec![uid(1)]).await;

        assert_eq!(controller.state(), GateState::Closed);
        assert_eq!(rig.indicators.status_text(), "Gate Closed");
        assert_eq!(rig.indicators.free_slots(), 4);
        assert_eq!(rig.indicators.led_color(), LedColor::Green);
    }

    #[tokio::test]
    async fn test_no_card_stays_closed() {
        let (mut controller, _rig) = build(vec![uid(1)]).await;

        for _ in 0..5 {
            assert_eq!(controller.poll().await.unwrap(), GateState::Closed);
        }
        assert!(controller.history().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_card_is_denied() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(9)).await.unwrap();
        assert_eq!(controller.poll().await.unwrap(), GateState::Closed);
        assert_eq!(rig.indicators.status_text(), "Access Denied!");
        assert!(!rig.actuator.is_open());
    }

    #[tokio::test]
    async fn test_denial_notice_expires_back_to_state_text() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(9)).await.unwrap();
        controller.poll().await.unwrap();
        assert_eq!(rig.indicators.status_text(), "Access Denied!");

        rig.clock.advance(1_500);
        controller.poll().await.unwrap();
        assert_eq!(rig.indicators.status_text(), "Gate Closed");
    }

    #[tokio::test]
    async fn test_authorized_card_starts_entry_flow() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(1)).await.unwrap();
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::AuthorizedWaitingVehicle
        );
        assert_eq!(rig.indicators.status_text(), "Proceed to gate");
        // Barrier only moves once the vehicle arrives.
        assert!(!rig.actuator.is_open());
    }

    #[tokio::test]
    async fn test_reader_fault_treated_as_no_card() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.inject_fault("collision detected").await.unwrap();
        assert_eq!(controller.poll().await.unwrap(), GateState::Closed);

        // The fault is transient; a card on the next cycle is honored.
        rig.reader.present_card(uid(1)).await.unwrap();
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::AuthorizedWaitingVehicle
        );
    }

    #[tokio::test]
    async fn test_authorization_expires_without_vehicle() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(1)).await.unwrap();
        controller.poll().await.unwrap();

        rig.clock.advance(9_999);
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::AuthorizedWaitingVehicle
        );

        rig.clock.advance(1);
        assert_eq!(controller.poll().await.unwrap(), GateState::Closed);
        assert!(!rig.actuator.is_open());
        assert!(controller.registry().is_empty());
    }

    #[tokio::test]
    async fn test_vehicle_on_wrong_side_does_not_open() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(1)).await.unwrap();
        controller.poll().await.unwrap();

        // Entry flow; a vehicle at the exit sensor must not trigger it.
        rig.sensors.set_exit(true);
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::AuthorizedWaitingVehicle
        );
        assert!(!rig.actuator.is_open());
    }

    #[tokio::test]
    async fn test_entry_vehicle_opens_barrier() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(1)).await.unwrap();
        controller.poll().await.unwrap();

        rig.sensors.set_entry(true);
        assert_eq!(controller.poll().await.unwrap(), GateState::Opening);
        assert!(rig.actuator.is_open());
        assert_eq!(rig.indicators.status_text(), "Gate Opening...");
    }

    #[tokio::test]
    async fn test_opening_completes_after_travel() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(1)).await.unwrap();
        controller.poll().await.unwrap();
        rig.sensors.set_entry(true);
        controller.poll().await.unwrap();

        rig.clock.advance(499);
        assert_eq!(controller.poll().await.unwrap(), GateState::Opening);

        rig.clock.advance(1);
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::OpenWaitingPassage
        );
        assert_eq!(rig.indicators.status_text(), "Please pass...");
    }

    /// Drive an entry flow up to `OpenWaitingPassage` with the vehicle
    /// still occluding the entry sensor.
    async fn open_for_entry(controller: &mut TestController, rig: &Rig, card: CardUid) {
        rig.reader.present_card(card).await.unwrap();
        controller.poll().await.unwrap();
        rig.sensors.set_entry(true);
        controller.poll().await.unwrap();
        rig.clock.advance(500);
        controller.poll().await.unwrap();
        assert_eq!(controller.state(), GateState::OpenWaitingPassage);
        // One cycle with the vehicle under the gate arms the passage.
        controller.poll().await.unwrap();
    }

    #[tokio::test]
    async fn test_passage_confirmed_mutates_registry_once() {
        let (mut controller, rig) = build(vec![uid(1)]).await;
        open_for_entry(&mut controller, &rig, uid(1)).await;

        // Vehicle still under the gate: armed but not confirmed.
        controller.poll().await.unwrap();
        assert_eq!(controller.state(), GateState::OpenWaitingPassage);
        assert!(controller.registry().is_empty());

        rig.sensors.clear_all();
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::WaitBeforeClosing
        );
        assert!(controller.registry().contains(&uid(1)));
        assert_eq!(controller.registry().len(), 1);
        assert_eq!(rig.indicators.status_text(), "Vehicle passed!");
        assert_eq!(rig.indicators.free_slots(), 3);
        assert_eq!(rig.indicators.led_color(), LedColor::Blue);
        assert_eq!(controller.events().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_sensors_without_arming_do_not_confirm() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(1)).await.unwrap();
        controller.poll().await.unwrap();
        rig.sensors.set_entry(true);
        controller.poll().await.unwrap();

        // Vehicle backs away during the opening travel: the open state
        // starts with both sensors clear and the passage never armed.
        rig.sensors.clear_all();
        rig.clock.advance(500);
        controller.poll().await.unwrap();
        assert_eq!(controller.state(), GateState::OpenWaitingPassage);

        // Clear sensors alone must not count as a passage.
        for _ in 0..5 {
            rig.clock.advance(50);
            assert_eq!(
                controller.poll().await.unwrap(),
                GateState::OpenWaitingPassage
            );
        }
        assert!(controller.registry().is_empty());
    }

    #[tokio::test]
    async fn test_passage_timeout_keeps_registry_unchanged() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        rig.reader.present_card(uid(1)).await.unwrap();
        controller.poll().await.unwrap();
        rig.sensors.set_entry(true);
        controller.poll().await.unwrap();
        rig.clock.advance(500);

        // Vehicle backs off before passing; gate area clear.
        rig.sensors.clear_all();
        controller.poll().await.unwrap();
        assert_eq!(controller.state(), GateState::OpenWaitingPassage);

        // The fallback skips the settle delay: close at once, and no
        // passage notice for a passage that never happened.
        rig.clock.advance(15_000);
        assert_eq!(controller.poll().await.unwrap(), GateState::Closing);
        assert!(!rig.actuator.is_open());
        assert_eq!(rig.indicators.status_text(), "Gate Closing...");
        assert!(controller.registry().is_empty());
        assert!(controller.events().is_empty());

        rig.clock.advance(500);
        assert_eq!(controller.poll().await.unwrap(), GateState::Closed);
    }

    #[tokio::test]
    async fn test_passage_timeout_waits_for_clear_sensors() {
        let (mut controller, rig) = build(vec![uid(1)]).await;
        open_for_entry(&mut controller, &rig, uid(1)).await;

        // Timeout expires with the vehicle still under the gate.
        rig.clock.advance(15_000);
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::OpenWaitingPassage
        );

        // Clearing resolves the armed passage instead of the fallback.
        rig.sensors.clear_all();
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::WaitBeforeClosing
        );
        assert_eq!(controller.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_full_registry_at_confirmation_holds_the_gate_open() {
        let (mut controller, rig) = build(vec![uid(1)]).await;
        open_for_entry(&mut controller, &rig, uid(1)).await;

        // Fill the lot behind the flow's back. Only reachable by poking
        // the registry directly; the scan-time capacity check covers the
        // public path.
        for n in 10..14u8 {
            assert!(controller.registry.try_add(uid(n)));
        }

        // Confirmation fails to add the entry: the gate stays open, the
        // registry and event log stay untouched, and the card stays
        // pending.
        rig.sensors.clear_all();
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::OpenWaitingPassage
        );
        assert!(!controller.registry().contains(&uid(1)));
        assert!(controller.events().is_empty());
        assert!(rig.actuator.is_open());

        // A slot frees and the held passage completes on the next cycle.
        assert!(controller.registry.remove(&uid(10)));
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::WaitBeforeClosing
        );
        assert!(controller.registry().contains(&uid(1)));
        assert_eq!(controller.events().len(), 1);
    }

    #[tokio::test]
    async fn test_settle_then_close_then_closed() {
        let (mut controller, rig) = build(vec![uid(1)]).await;
        open_for_entry(&mut controller, &rig, uid(1)).await;
        rig.sensors.clear_all();
        controller.poll().await.unwrap();

        rig.clock.advance(1_999);
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::WaitBeforeClosing
        );
        assert!(rig.actuator.is_open());

        rig.clock.advance(1);
        assert_eq!(controller.poll().await.unwrap(), GateState::Closing);
        assert!(!rig.actuator.is_open());

        rig.clock.advance(500);
        assert_eq!(controller.poll().await.unwrap(), GateState::Closed);
        assert_eq!(rig.indicators.status_text(), "Gate Closed");
    }

    #[tokio::test]
    async fn test_close_postponed_while_gate_area_occupied() {
        let (mut controller, rig) = build(vec![uid(1)]).await;
        open_for_entry(&mut controller, &rig, uid(1)).await;
        rig.sensors.clear_all();
        controller.poll().await.unwrap();

        // Another obstruction appears during the settle delay.
        rig.sensors.set_exit(true);
        rig.clock.advance(2_000);
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::WaitBeforeClosing
        );
        assert!(rig.actuator.is_open());

        // Still postponed until the area clears.
        rig.clock.advance(2_000);
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::WaitBeforeClosing
        );

        rig.sensors.clear_all();
        rig.clock.advance(2_000);
        assert_eq!(controller.poll().await.unwrap(), GateState::Closing);
    }

    #[tokio::test]
    async fn test_obstruction_while_closing_reopens() {
        let (mut controller, rig) = build(vec![uid(1)]).await;
        open_for_entry(&mut controller, &rig, uid(1)).await;
        rig.sensors.clear_all();
        controller.poll().await.unwrap();
        rig.clock.advance(2_000);
        controller.poll().await.unwrap();
        assert_eq!(controller.state(), GateState::Closing);

        rig.sensors.set_entry(true);
        assert_eq!(controller.poll().await.unwrap(), GateState::Opening);
        assert!(rig.actuator.is_open());
    }

    #[tokio::test]
    async fn test_exit_flow_removes_from_registry() {
        let (mut controller, rig) = build(vec![uid(1)]).await;

        // Enter first.
        open_for_entry(&mut controller, &rig, uid(1)).await;
        rig.sensors.clear_all();
        controller.poll().await.unwrap();
        rig.clock.advance(2_000);
        controller.poll().await.unwrap();
        rig.clock.advance(500);
        controller.poll().await.unwrap();
        assert_eq!(controller.state(), GateState::Closed);
        assert_eq!(controller.registry().len(), 1);

        // Same card again is an exit: the exit sensor drives the flow.
        rig.reader.present_card(uid(1)).await.unwrap();
        controller.poll().await.unwrap();
        rig.sensors.set_exit(true);
        controller.poll().await.unwrap();
        rig.clock.advance(500);
        controller.poll().await.unwrap();
        assert_eq!(controller.state(), GateState::OpenWaitingPassage);
        controller.poll().await.unwrap();

        rig.sensors.clear_all();
        controller.poll().await.unwrap();
        assert!(controller.registry().is_empty());
        assert_eq!(rig.indicators.free_slots(), 4);
        assert_eq!(rig.indicators.led_color(), LedColor::Green);
        assert_eq!(controller.events().len(), 2);
        assert_eq!(controller.events()[1].direction, Intent::Exit);
    }

    #[tokio::test]
    async fn test_full_parking_refuses_entry() {
        let (mut controller, rig) = build(vec![uid(1), uid(2), uid(3), uid(4), uid(5)]).await;

        // Fill all four slots.
        for n in 1..=4u8 {
            rig.reader.present_card(uid(n)).await.unwrap();
            controller.poll().await.unwrap();
            rig.sensors.set_entry(true);
            controller.poll().await.unwrap();
            rig.clock.advance(500);
            controller.poll().await.unwrap();
            controller.poll().await.unwrap();
            rig.sensors.clear_all();
            controller.poll().await.unwrap();
            rig.clock.advance(2_000);
            controller.poll().await.unwrap();
            rig.clock.advance(500);
            controller.poll().await.unwrap();
            assert_eq!(controller.state(), GateState::Closed);
        }
        assert!(controller.registry().is_full());
        assert_eq!(rig.indicators.led_color(), LedColor::Red);
        assert_eq!(rig.indicators.free_slots(), 0);

        // A fifth authorized card cannot enter.
        rig.reader.present_card(uid(5)).await.unwrap();
        assert_eq!(controller.poll().await.unwrap(), GateState::Closed);
        assert_eq!(rig.indicators.status_text(), "Parking is full!");
        assert!(!rig.actuator.is_open());

        // But a parked card can still leave.
        rig.clock.advance(1_500);
        controller.poll().await.unwrap();
        rig.reader.present_card(uid(2)).await.unwrap();
        assert_eq!(
            controller.poll().await.unwrap(),
            GateState::AuthorizedWaitingVehicle
        );
    }

    #[tokio::test]
    async fn test_card_reads_ignored_outside_closed() {
        let (mut controller, rig) = build(vec![uid(1), uid(2)]).await;
        open_for_entry(&mut controller, &rig, uid(1)).await;

        // A second card while the gate is open must not start a flow; it
        // stays queued and is consumed once the gate is closed again.
        rig.reader.present_card(uid(2)).await.unwrap();
        controller.poll().await.unwrap();
        assert_eq!(controller.state(), GateState::OpenWaitingPassage);
    }

    #[tokio::test]
    async fn test_history_records_full_entry_flow() {
        let (mut controller, rig) = build(vec![uid(1)]).await;
        open_for_entry(&mut controller, &rig, uid(1)).await;
        rig.sensors.clear_all();
        controller.poll().await.unwrap();
        rig.clock.advance(2_000);
        controller.poll().await.unwrap();
        rig.clock.advance(500);
        controller.poll().await.unwrap();

        let states: Vec<GateState> = controller.history().iter().map(|t| t.to).collect();
        assert_eq!(
            states,
            vec![
                GateState::AuthorizedWaitingVehicle,
                GateState::Opening,
                GateState::OpenWaitingPassage,
                GateState::WaitBeforeClosing,
                GateState::Closing,
                GateState::Closed,
            ]
        );
    }
}
