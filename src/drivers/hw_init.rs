//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, pulls, the ADC unit, and the GPIO ISR
//! service using raw ESP-IDF sys calls. Called once from `main()` before
//! the control loop starts; nothing here runs again afterwards.

use crate::error::Result;
#[cfg(target_os = "espidf")]
use crate::error::{Error, SensorError};
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<()> {
    // SAFETY: called once from main() before the control loop;
    // single-threaded.
    unsafe {
        init_outputs()?;
        init_setup_input()?;
        init_adc()?;
    }
    log::info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── Digital outputs (pump, probe excitation) ──────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_outputs() -> Result<()> {
    for gpio in [pins::PUMP_GPIO, pins::SENSOR_EN_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        if unsafe { gpio_config(&cfg) } != ESP_OK {
            return Err(SensorError::GpioConfigFailed.into());
        }
        // Both outputs idle low.
        if unsafe { gpio_set_level(gpio, 0) } != ESP_OK {
            return Err(SensorError::GpioConfigFailed.into());
        }
    }
    Ok(())
}

// ── Setup control input (active-low, pulled up, any-edge IRQ) ─

#[cfg(target_os = "espidf")]
unsafe fn init_setup_input() -> Result<()> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::SETUP_BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    if unsafe { gpio_config(&cfg) } != ESP_OK {
        return Err(Error::Init("setup input"));
    }
    Ok(())
}

// ── ADC (oneshot unit, driven free-running by a timer) ────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: written once in `init_adc()` before the control loop; read only
/// from the sampling timer callback afterwards.
#[cfg(target_os = "espidf")]
pub(crate) unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<()> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    if unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) } != ESP_OK {
        return Err(SensorError::AdcInitFailed.into());
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: pins::SENSOR_ADC_ATTEN as adc_atten_t,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let channel = pins::SENSOR_ADC_GPIO as adc_channel_t;
    if unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) } != ESP_OK {
        return Err(SensorError::AdcInitFailed.into());
    }
    Ok(())
}

// ── GPIO write helper used by the actuator drivers ────────────

#[cfg(target_os = "espidf")]
pub fn gpio_write(gpio: i32, high: bool) {
    // SAFETY: pin was configured as output in init_outputs().
    unsafe {
        gpio_set_level(gpio, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_gpio: i32, _high: bool) {
    // Host: drivers track state in memory; nothing to poke.
}

/// Read an input pin. Safe from ISR context (register read only).
#[cfg(target_os = "espidf")]
pub fn gpio_read(gpio: i32) -> bool {
    // SAFETY: pin was configured as input in init_setup_input().
    unsafe { gpio_get_level(gpio) != 0 }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_gpio: i32) -> bool {
    true
}
