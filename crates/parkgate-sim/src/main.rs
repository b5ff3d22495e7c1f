//! Terminal simulator for the parkgate barrier controller.
//!
//! Wires the controller to the mock peripherals and the virtual gate panel,
//! then drives a scripted day at the gate: a rejected card, two entries, a
//! full refusal once capacity is reached, and an exit. The panel is rendered
//! after each phase so the indicator flow is visible in the terminal.
//!
//! Timings are scaled down from the deployed gate values so the whole
//! script finishes in a few seconds. Set `RUST_LOG=debug` to watch every
//! state transition.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use parkgate_controller::{AuthorizationList, BarrierController, ControllerConfig};
use parkgate_core::CardUid;
use parkgate_hardware::mock::{
    MockBarrierActuator, MockBarrierActuatorHandle, MockCardReader, MockCardReaderHandle,
    MockPresenceSensors, MockPresenceSensorsHandle,
};
use parkgate_hardware::{Indicators, SystemClock, VirtualPanel};

/// Panel shared between the controller task and the rendering side of the
/// simulator.
#[derive(Clone)]
struct SharedPanel {
    inner: Arc<Mutex<VirtualPanel>>,
}

impl SharedPanel {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VirtualPanel::default())),
        }
    }

    async fn render(&self) -> String {
        self.inner.lock().await.render()
    }
}

impl Indicators for SharedPanel {
    async fn set_status_text(&mut self, text: &str) -> parkgate_hardware::Result<()> {
        self.inner.lock().await.set_status_text(text).await
    }

    async fn set_free_slots(&mut self, count: usize) -> parkgate_hardware::Result<()> {
        self.inner.lock().await.set_free_slots(count).await
    }

    async fn set_occupancy_color(
        &mut self,
        color: parkgate_hardware::LedColor,
    ) -> parkgate_hardware::Result<()> {
        self.inner.lock().await.set_occupancy_color(color).await
    }
}

/// Handles the script uses to play the outside world.
struct GateYard {
    reader: MockCardReaderHandle,
    sensors: MockPresenceSensorsHandle,
    actuator: MockBarrierActuatorHandle,
    panel: SharedPanel,
    config: ControllerConfig,
}

impl GateYard {
    /// Present a card and, if the barrier opens, drive through on the
    /// given side.
    async fn attempt_passage(&self, card: CardUid, entering: bool) -> Result<()> {
        self.reader.present_card(card).await?;
        tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms * 4)).await;

        // Vehicle pulls up to its sensor.
        if entering {
            self.sensors.set_entry(true);
        } else {
            self.sensors.set_exit(true);
        }

        // Wait out the opening travel plus a couple of poll cycles; if the
        // barrier never opened the card was refused.
        tokio::time::sleep(Duration::from_millis(
            self.config.actuator_travel_ms + self.config.poll_interval_ms * 4,
        ))
        .await;

        if self.actuator.is_open() {
            // Drive through and clear the gate area.
            self.sensors.clear_all();
            tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms * 4)).await;

            // Let the gate settle and close again.
            tokio::time::sleep(Duration::from_millis(
                self.config.settle_before_closing_ms
                    + self.config.actuator_travel_ms
                    + self.config.poll_interval_ms * 4,
            ))
            .await;
        } else {
            self.sensors.clear_all();
        }

        println!("{}\n", self.panel.render().await);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Scaled-down timings so the scripted day fits in a few seconds.
    let config = ControllerConfig {
        capacity: 2,
        authorized_timeout_ms: 1_000,
        passage_timeout_ms: 1_500,
        settle_before_closing_ms: 300,
        actuator_travel_ms: 150,
        poll_interval_ms: 20,
        notice_hold_ms: 400,
    };

    let resident = CardUid::new([0xD3, 0xA7, 0xB1, 0x28]);
    let visitor = CardUid::new([0x4E, 0x12, 0x90, 0x5C]);
    let latecomer = CardUid::new([0x77, 0x31, 0x0A, 0x99]);
    let stranger = CardUid::new([0xDE, 0xAD, 0xBE, 0xEF]);

    let (reader, reader_handle) = MockCardReader::new();
    let (sensors, sensor_handle) = MockPresenceSensors::new();
    let (actuator, actuator_handle) = MockBarrierActuator::new();
    let panel = SharedPanel::new();

    let authorized = AuthorizationList::from_uids(vec![resident, visitor, latecomer]);
    let mut controller = BarrierController::new(
        SystemClock::new(),
        reader,
        sensors,
        actuator,
        panel.clone(),
        authorized,
        config.clone(),
    );

    tokio::spawn(async move {
        if let Err(error) = controller.run().await {
            tracing::error!(%error, "controller stopped");
        }
    });

    let yard = GateYard {
        reader: reader_handle,
        sensors: sensor_handle,
        actuator: actuator_handle,
        panel: panel.clone(),
        config,
    };

    // Let the controller push its initial indicators.
    tokio::time::sleep(Duration::from_millis(100)).await;
    println!("{}\n", yard.panel.render().await);

    info!(uid = %stranger, "unknown card tries the gate");
    yard.reader.present_card(stranger).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("{}\n", yard.panel.render().await);

    info!(uid = %resident, "resident enters");
    yard.attempt_passage(resident, true).await?;

    info!(uid = %visitor, "visitor enters, parking is now full");
    yard.attempt_passage(visitor, true).await?;

    info!(uid = %latecomer, "authorized latecomer refused: parking full");
    yard.reader.present_card(latecomer).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("{}\n", yard.panel.render().await);

    info!(uid = %resident, "resident leaves");
    yard.attempt_passage(resident, false).await?;

    info!("simulation finished");
    Ok(())
}
