//! GPIO / peripheral pin assignments for the Autowater main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Pump actuator (low-side MOSFET driving a small diaphragm pump)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = pump running.
pub const PUMP_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Moisture sensor (resistive probe, excitation-switched)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = probe excitation on. Powered down between
/// measurements to limit electrolytic corrosion and leakage current.
pub const SENSOR_EN_GPIO: i32 = 3;

/// Probe voltage divider — analog input. ADC1 channel 2 (GPIO 2 on the C3).
pub const SENSOR_ADC_GPIO: i32 = 2;

/// ADC attenuation for the probe divider (11 dB → 0 – 3.1 V range).
pub const SENSOR_ADC_ATTEN: u32 = 3;

// ---------------------------------------------------------------------------
// Operator control (active-low momentary button with pull-up)
// ---------------------------------------------------------------------------

/// Calibration button. Held LOW while the operator is pressing it.
/// GPIO 9 is the boot button on C3 devkits — reused as the setup control.
pub const SETUP_BUTTON_GPIO: i32 = 9;
