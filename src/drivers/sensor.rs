//! Moisture probe excitation driver.
//!
//! The resistive probe is only energized while a measurement is in
//! progress; leaving it powered corrodes the electrodes and wastes the
//! battery. The sampler turns it on, waits one settle tick, reads, and
//! turns it back off.

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Default)]
pub struct SensorExcitation {
    energized: bool,
}

impl SensorExcitation {
    pub fn new() -> Self {
        Self { energized: false }
    }

    pub fn on(&mut self) {
        if !self.energized {
            hw_init::gpio_write(pins::SENSOR_EN_GPIO, true);
            self.energized = true;
        }
    }

    pub fn off(&mut self) {
        if self.energized {
            hw_init::gpio_write(pins::SENSOR_EN_GPIO, false);
            self.energized = false;
        }
    }

    pub fn is_on(&self) -> bool {
        self.energized
    }
}
