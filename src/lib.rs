//! Autowater firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod config;
pub mod controller;
pub mod power;
pub mod sampler;
pub mod state;
pub mod timing;

pub mod error;
pub mod pins;

// Hardware-facing modules; the actual register pokes are guarded by
// cfg attributes inside, so these compile (in simulation mode) on host.
pub mod adapters;
pub mod drivers;
