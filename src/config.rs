//! System configuration parameters
//!
//! All tunable parameters for the Autowater controller. Values mirror the
//! board defaults; they can be overridden via the NVS config blob.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Measurement ---
    /// Number of ADC conversions averaged into one moisture reading.
    pub adc_samples: u8,
    /// Short-timeout ticks to wait after probe excitation before sampling
    /// (lets the divider voltage settle).
    pub sensor_settle_ticks: u8,

    // --- Calibration ---
    /// Upper bound on the calibration countdown, in short-timeout ticks.
    /// Also the cap on the derived pump duration (~20 s at 250 ms/tick).
    pub max_wait_budget: u8,

    // --- Idle ---
    /// Long-timeout ticks slept between automatic cycles (~64 s at 8 s/tick).
    pub idle_increments: u8,

    // --- Failure policy ---
    /// Consecutive non-improving above-goal readings tolerated before a
    /// confirmed actuation failure. The counter must *strictly exceed*
    /// this value to halt.
    pub max_failures: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            adc_samples: 10,
            sensor_settle_ticks: 1,
            max_wait_budget: 80,
            idle_increments: 8,
            max_failures: 2,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Rejected configs must never reach the
    /// controller; persistence adapters call this before saving and after
    /// loading.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.adc_samples == 0 {
            return Err("adc_samples must be at least 1");
        }
        // The sample accumulator is 16-bit; 64 samples of 0xFF still fit.
        if self.adc_samples > 64 {
            return Err("adc_samples must be at most 64");
        }
        if self.max_wait_budget == 0 {
            return Err("max_wait_budget must be at least 1");
        }
        if self.idle_increments == 0 {
            return Err("idle_increments must be at least 1");
        }
        Ok(())
    }
}
