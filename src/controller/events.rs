//! Outbound controller events.
//!
//! The [`Controller`](super::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port. The production adapter
//! writes them to the serial log; tests record them to assert on the
//! control flow without peeking at internals.

use super::Phase;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The controller entered its outer loop (first calibration pending).
    Started,

    /// A phase boundary was crossed.
    PhaseChanged { from: Phase, to: Phase },

    /// Calibration finished; carries the derived pump duration in ticks.
    CalibrationDone { pump_ticks: u8 },

    /// The goal value was (re)derived from a post-calibration measurement.
    GoalSet(u8),

    /// A measurement completed.
    Measurement { prev: u8, curr: u8, goal: u8 },

    /// The pump ran for the given number of ticks (may be cut short by a
    /// setup gesture).
    PumpRun { ticks: u8 },

    /// A non-improving above-goal reading escalated the failure counter.
    FailureEscalated(u8),

    /// The failure counter crossed its threshold; actuation is abandoned
    /// until the operator recalibrates.
    FailureConfirmed,

    /// End-of-cycle snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub phase: Phase,
    pub prev: u8,
    pub curr: u8,
    pub goal: u8,
    pub pump_ticks: u8,
    pub failure_count: u8,
    pub cycles_completed: u32,
    /// Extremes over the recent-measurement window (moisture trend).
    pub recent_min: u8,
    pub recent_max: u8,
}
