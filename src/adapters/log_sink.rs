//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured controller events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::controller::events::ControllerEvent;
use crate::controller::ports::EventSink;

/// Adapter that logs every [`ControllerEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Started => {
                info!("START | waiting for first calibration");
            }
            ControllerEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            ControllerEvent::CalibrationDone { pump_ticks } => {
                info!("CALIB | pump_ticks={}", pump_ticks);
            }
            ControllerEvent::GoalSet(goal) => {
                info!("GOAL  | goal={}", goal);
            }
            ControllerEvent::Measurement { prev, curr, goal } => {
                info!("MEAS  | prev={} curr={} goal={}", prev, curr, goal);
            }
            ControllerEvent::PumpRun { ticks } => {
                info!("PUMP  | ran {} ticks", ticks);
            }
            ControllerEvent::FailureEscalated(count) => {
                warn!("FAIL  | dry run suspected, count={}", count);
            }
            ControllerEvent::FailureConfirmed => {
                warn!("FAIL  | confirmed — pumping disabled until recalibration");
            }
            ControllerEvent::Telemetry(t) => {
                info!(
                    "TELEM | phase={:?} | prev={} curr={} goal={} | pump_ticks={} \
                     failures={} cycles={} | window={}..{}",
                    t.phase,
                    t.prev,
                    t.curr,
                    t.goal,
                    t.pump_ticks,
                    t.failure_count,
                    t.cycles_completed,
                    t.recent_min,
                    t.recent_max,
                );
            }
        }
    }
}
