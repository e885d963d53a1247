//! Unified error types for the Autowater firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level bring-up path's error handling
//! uniform. All variants are `Copy` so they can be cheaply passed around
//! without allocation. The control loop itself is infallible by design —
//! these errors only arise during one-shot initialization and configuration.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor peripheral could not be brought up or read.
    Sensor(SensorError),
    /// Peripheral initialisation failed (carries the failing subsystem).
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC unit or channel configuration was rejected.
    AdcInitFailed,
    /// ADC conversion returned an error.
    AdcReadFailed,
    /// GPIO configuration was rejected.
    GpioConfigFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcInitFailed => write!(f, "ADC init failed"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::GpioConfigFailed => write!(f, "GPIO config failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
