//! Hardware adapter — bridges real peripherals to the controller's ports.
//!
//! Owns the actuator drivers and the power manager, exposing them through
//! [`ActuatorPort`], [`AdcControlPort`] and [`SleepPort`]. This is the
//! only module that wires drivers to the domain. On non-espidf targets
//! the underlying drivers are in-memory simulation stubs.

use crate::controller::ports::{ActuatorPort, AdcControlPort, SleepPort};
use crate::drivers::adc;
use crate::drivers::pump::PumpDriver;
use crate::drivers::sensor::SensorExcitation;
use crate::power::{PowerManager, SleepMode};
use crate::timing::TimeoutClass;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    pump: PumpDriver,
    probe: SensorExcitation,
    power: PowerManager,
}

impl HardwareAdapter {
    pub fn new(pump: PumpDriver, probe: SensorExcitation, power: PowerManager) -> Self {
        Self { pump, probe, power }
    }
}

impl Default for HardwareAdapter {
    fn default() -> Self {
        Self::new(PumpDriver::new(), SensorExcitation::new(), PowerManager::new())
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn pump_on(&mut self) {
        self.pump.on();
    }

    fn pump_off(&mut self) {
        self.pump.off();
    }

    fn sensor_on(&mut self) {
        self.probe.on();
    }

    fn sensor_off(&mut self) {
        self.probe.off();
    }

    fn is_pumping(&self) -> bool {
        self.pump.is_on()
    }

    fn all_off(&mut self) {
        self.pump.off();
        self.probe.off();
    }
}

// ── AdcControlPort implementation ─────────────────────────────

impl AdcControlPort for HardwareAdapter {
    fn adc_enable(&mut self) {
        adc::start_free_running();
    }

    fn adc_disable(&mut self) {
        adc::stop_free_running();
    }
}

// ── SleepPort implementation ──────────────────────────────────

impl SleepPort for HardwareAdapter {
    fn arm_timer(&mut self, class: TimeoutClass) {
        self.power.arm_timer(class);
    }

    fn sleep(&mut self, mode: SleepMode) {
        self.power.sleep(mode);
    }
}
