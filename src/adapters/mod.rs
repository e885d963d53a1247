//! Driven adapters — concrete implementations of the controller's ports.

pub mod config_store;
pub mod hardware;
pub mod log_sink;

pub use config_store::NvsConfigStore;
pub use hardware::HardwareAdapter;
pub use log_sink::LogEventSink;
