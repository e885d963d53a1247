//! Pump actuator driver.
//!
//! Thin wrapper over the pump GPIO. Duty limiting lives in the control
//! loop (the stored calibration budget), not here.

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Default)]
pub struct PumpDriver {
    running: bool,
}

impl PumpDriver {
    pub fn new() -> Self {
        Self { running: false }
    }

    pub fn on(&mut self) {
        if !self.running {
            hw_init::gpio_write(pins::PUMP_GPIO, true);
            self.running = true;
            log::debug!("pump: on");
        }
    }

    pub fn off(&mut self) {
        if self.running {
            hw_init::gpio_write(pins::PUMP_GPIO, false);
            self.running = false;
            log::debug!("pump: off");
        }
    }

    pub fn is_on(&self) -> bool {
        self.running
    }
}
