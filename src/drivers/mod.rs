//! Hardware drivers.
//!
//! Dumb actuator/peripheral wrappers plus the one-shot bring-up module.
//! Register access is confined to `#[cfg(target_os = "espidf")]` blocks;
//! on host every driver tracks its state in memory only.

pub mod adc;
pub mod hw_init;
pub mod pump;
pub mod sensor;
pub mod setup_input;
