//! Autowater firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter      LogEventSink      NvsConfigStore   │
//! │  (Actuator+Adc+Sleep) (EventSink)       (ConfigPort)     │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ──────────────        │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │          Controller (pure phase logic)         │      │
//! │  │  calibrate · measure · pump · idle             │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  SharedState (ISR-fed atomics) · PowerManager (sleep)    │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use autowater::adapters::{HardwareAdapter, LogEventSink, NvsConfigStore};
use autowater::config::SystemConfig;
use autowater::controller::ports::{ActuatorPort, ConfigPort};
use autowater::controller::{Controller, PhaseOutcome};
use autowater::state::SHARED;
use autowater::{drivers, power};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("autowater v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Hardware bring-up ──────────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = drivers::setup_input::install() {
        log::error!("setup input init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    power::gate_unused_clocks();

    // ── 3. Configuration (NVS or defaults) ────────────────────
    let config = match NvsConfigStore::new() {
        Ok(store) => match store.load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("config load failed ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            SystemConfig::default()
        }
    };

    // ── 4. Adapters + controller ──────────────────────────────
    let mut hw = HardwareAdapter::default();
    let mut sink = LogEventSink::new();
    let mut controller = Controller::new(config);
    controller.start(&mut sink);

    info!("entering control loop — hold the setup button to calibrate");

    // ── 5. Control loop ───────────────────────────────────────
    //
    // run_once() blocks through the sleep port for the whole cycle life
    // and returns only when the operator asks for recalibration or the
    // failure policy trips. Either way the answer is the same: go back
    // to calibration (which itself sleeps until the button is held).
    loop {
        match controller.run_once(&SHARED, &mut hw, &mut sink) {
            PhaseOutcome::Recalibrate => {
                info!("setup gesture observed — recalibrating");
            }
            PhaseOutcome::Failure => {
                warn!("actuation failure confirmed — waiting for operator");
            }
            PhaseOutcome::Continue => unreachable!("run_once never yields Continue"),
        }
        hw.all_off();
    }
}
