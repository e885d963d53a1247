//! Free-running ADC sampler using ESP-IDF's esp_timer API.
//!
//! While enabled, a periodic timer reads the probe ADC channel and pushes
//! the top eight bits of each conversion into [`SharedState`]. The sampler
//! module idles between conversions and stops the timer once enough
//! samples have accumulated.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely touch the atomics in `state::SHARED`.
//!
//! [`SharedState`]: crate::state::SharedState

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;
#[cfg(target_os = "espidf")]
use crate::state::SHARED;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Interval between conversions while free-running.
#[cfg(target_os = "espidf")]
const SAMPLE_PERIOD_US: u64 = 2_000;

#[cfg(target_os = "espidf")]
static mut SAMPLE_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: SAMPLE_TIMER is written once in `start_free_running()` from the
/// single main-task context before the callback can fire.
#[cfg(target_os = "espidf")]
unsafe fn sample_timer() -> esp_timer_handle_t {
    unsafe { SAMPLE_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn sample_cb(_arg: *mut core::ffi::c_void) {
    let mut raw: i32 = 0;
    let channel = pins::SENSOR_ADC_GPIO as adc_channel_t;
    // SAFETY: handle was created during hw_init before any timer runs.
    let rc = unsafe { adc_oneshot_read(hw_init::adc1_handle(), channel, &mut raw) };
    if rc == ESP_OK {
        // Keep only the high byte of the 12-bit conversion; the control
        // loop works entirely in 8-bit moisture units.
        SHARED.adc_sample((raw >> 4) as u8);
    } else {
        // Dropped conversion; the sampler just waits for the next one.
        log::warn!("adc: {} (rc={rc})", crate::error::SensorError::AdcReadFailed);
    }
}

/// Begin periodic conversions. Idempotent once the timer exists.
#[cfg(target_os = "espidf")]
pub fn start_free_running() {
    // SAFETY: SAMPLE_TIMER is created once from the main task; the callback
    // only touches SHARED atomics.
    unsafe {
        if SAMPLE_TIMER.is_null() {
            let args = esp_timer_create_args_t {
                callback: Some(sample_cb),
                arg: core::ptr::null_mut(),
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: b"adc_sample\0".as_ptr() as *const _,
                skip_unhandled_events: false,
            };
            let rc = esp_timer_create(&args, &raw mut SAMPLE_TIMER);
            if rc != ESP_OK {
                log::error!("adc: sample timer create failed (rc={rc})");
                return;
            }
        }
        let rc = esp_timer_start_periodic(sample_timer(), SAMPLE_PERIOD_US);
        if rc != ESP_OK {
            log::error!("adc: sample timer start failed (rc={rc})");
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_free_running() {
    // Host: the sleep loop feeds SHARED directly.
}

/// Halt conversions until the next measurement window.
#[cfg(target_os = "espidf")]
pub fn stop_free_running() {
    // SAFETY: null-check guards against stop before start.
    unsafe {
        let t = sample_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_free_running() {}
