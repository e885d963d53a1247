//! Port traits — the boundary between the control logic and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (actuators, the analog front end, the sleep machinery,
//! event sinks, config storage) implement these traits. The
//! [`Controller`](super::Controller) consumes them via generics, so the
//! phase logic never touches hardware directly and the whole control loop
//! runs against mocks on the host.

use crate::config::SystemConfig;
use crate::power::SleepMode;
use crate::timing::TimeoutClass;

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the two digital outputs the controller drives.
pub trait ActuatorPort {
    /// Energise the pump output.
    fn pump_on(&mut self);

    /// De-energise the pump output.
    fn pump_off(&mut self);

    /// Apply excitation voltage to the moisture probe.
    fn sensor_on(&mut self);

    /// Remove probe excitation (power saving, probe longevity).
    fn sensor_off(&mut self);

    /// Whether the pump output is currently energised.
    fn is_pumping(&self) -> bool;

    /// Kill both outputs — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Analog front-end control (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Gates the analog subsystem. While enabled, conversions run free and the
/// conversion interrupt feeds the shared sample accumulator; the domain
/// only ever switches the subsystem on and off around a measurement.
pub trait AdcControlPort {
    /// Power up the analog subsystem and start free-running conversions.
    fn adc_enable(&mut self);

    /// Stop conversions and power the analog subsystem back down.
    fn adc_disable(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Sleep port (domain → power management)
// ───────────────────────────────────────────────────────────────

/// The cooperative suspension seam. Every blocking wait in the controller
/// funnels through these two calls, which is what makes the phases
/// host-testable: a mock "sleeps" by simulating the interrupts that would
/// have fired.
pub trait SleepPort {
    /// Arm the one-shot periodic timer for the next suspension.
    fn arm_timer(&mut self, class: TimeoutClass);

    /// Suspend until an interrupt fires.
    fn sleep(&mut self, mode: SleepMode);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ControllerEvent`](super::events::ControllerEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// the trait exists so tests can record them).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControllerEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting and after loading —
/// a corrupted blob must never hand the controller an all-zero config.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
