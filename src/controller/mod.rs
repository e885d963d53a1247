//! The measure→pump→idle control core.
//!
//! [`Controller`] owns everything the phases mutate from the main flow:
//! the measurement history, the goal value, the calibrated pump duration,
//! and the failure tracker. Interrupt-written counters stay outside in
//! [`SharedState`](crate::state::SharedState); hardware access flows
//! through the port traits in [`ports`], so the entire phase machine runs
//! against mock adapters on the host.
//!
//! ```text
//!            ┌──────────────◀ Recalibrate / Failure ◀──────────────┐
//!            ▼                                                     │
//!   ┌─ CALIBRATE ─┐      ┌─ MEASURE ─┐   ┌─ PUMP ─┐   ┌─ IDLE ─┐   │
//!   │ hold button │ ───▶ │ 10-sample │──▶│ goal-  │──▶│ 8 long │ ──┘
//!   │ = pump time │      │  average  │   │ gated  │   │ ticks  │
//!   └─────────────┘      └───────────┘   └────────┘   └────┬───┘
//!            ▲                                             │
//!            └────────────────── next cycle ◀──────────────┘
//! ```

pub mod events;
pub mod failure;
pub mod phases;
pub mod ports;

use heapless::HistoryBuffer;

use crate::config::SystemConfig;
use events::{ControllerEvent, TelemetryData};
use failure::FailureTracker;
use ports::EventSink;

/// Number of recent measurements retained for the telemetry trend window.
const HISTORY_DEPTH: usize = 16;

/// The four phases of the control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Calibrate,
    Measure,
    Pump,
    Idle,
}

/// How a phase asked the outer loop to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Proceed to the next phase of the cycle.
    Continue,
    /// A setup gesture began; restart at calibration.
    Recalibrate,
    /// Confirmed actuation failure; restart at calibration and wait for
    /// the operator.
    Failure,
}

/// Main-flow state of the watering controller.
pub struct Controller {
    cfg: SystemConfig,
    phase: Phase,

    /// Previous averaged reading (8-bit).
    prev: u8,
    /// Current averaged reading (8-bit).
    curr: u8,
    /// Moisture goal; automatic pumping triggers only above it.
    goal: u8,
    /// One-shot guard: the next measurement re-derives the goal.
    goal_reset_needed: bool,

    /// Calibrated actuation length in short-timeout ticks.
    pump_ticks: u8,

    failures: FailureTracker,

    history: HistoryBuffer<u8, HISTORY_DEPTH>,
    cycles_completed: u32,
}

impl Controller {
    pub fn new(cfg: SystemConfig) -> Self {
        let failures = FailureTracker::new(cfg.max_failures);
        Self {
            cfg,
            phase: Phase::Calibrate,
            prev: 0,
            curr: 0,
            goal: 0,
            goal_reset_needed: false,
            pump_ticks: 0,
            failures,
            history: HistoryBuffer::new(),
            cycles_completed: 0,
        }
    }

    /// Announce the controller through the sink. Call once before the
    /// first [`run_once`](phases) invocation.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&ControllerEvent::Started);
        log::info!("controller started (goal uncalibrated, awaiting setup)");
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn goal(&self) -> u8 {
        self.goal
    }

    pub fn current(&self) -> u8 {
        self.curr
    }

    pub fn previous(&self) -> u8 {
        self.prev
    }

    pub fn pump_ticks(&self) -> u8 {
        self.pump_ticks
    }

    pub fn failure_count(&self) -> u8 {
        self.failures.count()
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    /// Build an end-of-cycle snapshot.
    pub fn telemetry(&self) -> TelemetryData {
        let recent_min = self.history.oldest_ordered().copied().min().unwrap_or(0);
        let recent_max = self.history.oldest_ordered().copied().max().unwrap_or(0);
        TelemetryData {
            phase: self.phase,
            prev: self.prev,
            curr: self.curr,
            goal: self.goal,
            pump_ticks: self.pump_ticks,
            failure_count: self.failures.count(),
            cycles_completed: self.cycles_completed,
            recent_min,
            recent_max,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Record a phase boundary and notify the sink.
    fn enter_phase(&mut self, to: Phase, sink: &mut impl EventSink) {
        if self.phase != to {
            sink.emit(&ControllerEvent::PhaseChanged {
                from: self.phase,
                to,
            });
            self.phase = to;
        }
    }
}
