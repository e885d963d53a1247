//! Averaged analog moisture measurement.
//!
//! One measurement = excite the probe, let the divider settle for one short
//! tick, switch the analog subsystem into free-running conversions, and
//! doze in the lighter ADC sleep until the conversion interrupt has
//! accumulated the configured number of samples. Both the probe excitation
//! and the analog subsystem are powered down again before the averaged
//! value is returned.
//!
//! No calibration curve is applied beyond raw averaging — downstream logic
//! works purely on relative comparisons against the goal and the previous
//! reading.

use crate::config::SystemConfig;
use crate::controller::ports::{ActuatorPort, AdcControlPort, SleepPort};
use crate::power::SleepMode;
use crate::state::SharedState;
use crate::timing::{self, AbortOn, SHORT_TIMEOUT};

/// Take one averaged moisture reading (truncated integer mean of the
/// sample high bytes, 8-bit).
///
/// Never returns before `cfg.adc_samples` conversions have accumulated;
/// the settling delay is uninterruptible so a setup gesture mid-measure is
/// only reported afterwards, by the caller.
pub fn measure(
    shared: &SharedState,
    hw: &mut (impl ActuatorPort + AdcControlPort + SleepPort),
    cfg: &SystemConfig,
) -> u8 {
    shared.reset_samples();
    hw.sensor_on();

    // Probe stabilization.
    timing::wait_ticks(
        shared,
        hw,
        cfg.sensor_settle_ticks,
        SHORT_TIMEOUT,
        AbortOn::Never,
    );

    hw.adc_enable();
    while shared.sample_count() < cfg.adc_samples {
        hw.sleep(SleepMode::AdcIdle);
    }
    hw.adc_disable();
    hw.sensor_off();

    let value = shared.sample_average();
    log::debug!(
        "measure: {} samples -> {}",
        shared.sample_count(),
        value
    );
    value
}
