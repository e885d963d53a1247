//! Setup control input driver.
//!
//! The calibration button is an active-low momentary switch with a
//! pull-up; the operator holds it to enter setup and releases it to
//! leave. An any-edge GPIO ISR samples the level after each edge and
//! mirrors it into [`SharedState::set_setup_active`], where the control
//! loop's wait primitives observe it. No debounce state machine: the
//! control loop reacts to the level, not to edges, so contact chatter
//! only causes redundant stores of the same value.
//!
//! [`SharedState::set_setup_active`]: crate::state::SharedState::set_setup_active

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::error::Error;
use crate::error::Result;
#[cfg(target_os = "espidf")]
use crate::pins;
#[cfg(target_os = "espidf")]
use crate::state::SHARED;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn setup_edge_isr(_arg: *mut core::ffi::c_void) {
    // Active-low: pressed while the pin reads 0.
    let pressed = !hw_init::gpio_read(pins::SETUP_BUTTON_GPIO);
    SHARED.set_setup_active(pressed);
}

/// Install the edge ISR. Call once after [`hw_init::init_peripherals`].
#[cfg(target_os = "espidf")]
pub fn install() -> Result<()> {
    // SAFETY: single installation from the main task at boot; the handler
    // only reads a pin level and stores one atomic.
    unsafe {
        let rc = gpio_install_isr_service(0);
        if rc != ESP_OK && rc != ESP_ERR_INVALID_STATE {
            return Err(Error::Init("gpio isr service"));
        }
        if gpio_isr_handler_add(
            pins::SETUP_BUTTON_GPIO,
            Some(setup_edge_isr),
            core::ptr::null_mut(),
        ) != ESP_OK
        {
            return Err(Error::Init("setup isr handler"));
        }
    }
    log::info!("setup_input: edge handler installed on gpio {}", pins::SETUP_BUTTON_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn install() -> Result<()> {
    log::info!("setup_input(sim): no ISR; tests drive the setup flag directly");
    Ok(())
}
