//! Sleep-state and peripheral-power management.
//!
//! The controller spends almost its entire life asleep. Two depths exist:
//!
//! - [`SleepMode::Deep`] — everything gated off, woken by the armed
//!   periodic timer or the setup pin-change interrupt. Used for all
//!   cooperative delays.
//! - [`SleepMode::AdcIdle`] — a lighter state that keeps the analog
//!   subsystem clocked so conversion-complete interrupts still fire.
//!   Used only while a measurement is accumulating samples.
//!
//! On ESP-IDF this maps to light sleep with a timer wake-up; on host the
//! same calls run a time-compressed simulation against the global
//! [`SHARED`](crate::state::SHARED) state so the binary's control flow can
//! be exercised without hardware.

use crate::timing::TimeoutClass;

#[cfg(target_os = "espidf")]
use crate::state::SHARED;

/// Processor sleep depth requested by the control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepMode {
    /// Deepest available state; only the timer and pin-change wake it.
    Deep,
    /// Analog subsystem stays powered; conversion interrupts wake it.
    AdcIdle,
}

/// Owns the wake-up timer and the peripheral clock gates.
pub struct PowerManager {
    armed: Option<TimeoutClass>,
}

impl PowerManager {
    pub fn new() -> Self {
        Self { armed: None }
    }

    /// Select the interval the next [`sleep`](Self::sleep) call wakes on.
    /// The timer source is one-shot: every suspension re-arms it.
    pub fn arm_timer(&mut self, class: TimeoutClass) {
        self.armed = Some(class);
    }

    /// Suspend until an interrupt fires.
    #[cfg(target_os = "espidf")]
    pub fn sleep(&mut self, mode: SleepMode) {
        use esp_idf_svc::sys::{
            esp_light_sleep_start, esp_sleep_enable_timer_wakeup, esp_sleep_get_wakeup_cause,
            esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER,
        };

        match mode {
            SleepMode::Deep => {
                if let Some(class) = self.armed {
                    // SAFETY: plain register configuration; single-threaded
                    // main flow is the only caller.
                    unsafe {
                        esp_sleep_enable_timer_wakeup(u64::from(class.millis()) * 1_000);
                        esp_light_sleep_start();
                        if esp_sleep_get_wakeup_cause() == esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER
                        {
                            SHARED.timer_tick();
                        }
                    }
                } else {
                    // No timer armed: only the setup pin-change can wake us.
                    // SAFETY: as above.
                    unsafe {
                        esp_light_sleep_start();
                    }
                }
            }
            SleepMode::AdcIdle => {
                // The sampling timer callback feeds SHARED while we yield.
                // A light sleep would stop the esp_timer dispatch task, so
                // this mode is a plain delay on this platform.
                std::thread::sleep(std::time::Duration::from_millis(2));
            }
        }
    }

    /// Suspend until an interrupt fires (host simulation).
    ///
    /// Time-compressed: one call means "the expected interrupt arrived".
    #[cfg(not(target_os = "espidf"))]
    pub fn sleep(&mut self, mode: SleepMode) {
        use crate::state::SHARED;

        std::thread::sleep(std::time::Duration::from_millis(1));
        match mode {
            SleepMode::Deep => {
                if self.armed.is_some() {
                    SHARED.timer_tick();
                }
            }
            // Mid-scale reading keeps a simulated run near its goal.
            SleepMode::AdcIdle => SHARED.adc_sample(128),
        }
    }
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Gate the clocks of every peripheral the controller never uses.
/// One-shot, called from `main` before the control loop starts.
#[cfg(target_os = "espidf")]
pub fn gate_unused_clocks() {
    use esp_idf_svc::sys::{esp_sleep_pd_config, esp_sleep_pd_domain_t_ESP_PD_DOMAIN_RTC_PERIPH,
        esp_sleep_pd_option_t_ESP_PD_OPTION_AUTO};

    // SAFETY: one-shot configuration before the control loop; values are
    // plain enum constants.
    unsafe {
        esp_sleep_pd_config(
            esp_sleep_pd_domain_t_ESP_PD_DOMAIN_RTC_PERIPH,
            esp_sleep_pd_option_t_ESP_PD_OPTION_AUTO,
        );
    }
    log::info!("power: unused peripheral domains set to auto power-down");
}

#[cfg(not(target_os = "espidf"))]
pub fn gate_unused_clocks() {
    log::info!("power(sim): clock gating skipped");
}
