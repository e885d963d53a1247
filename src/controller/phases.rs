//! Phase implementations and the outer control loop.
//!
//! Each phase is a blocking method: it suspends the processor through the
//! [`SleepPort`] whenever it has nothing to do and re-checks the shared
//! counters after every wake-up. Setup gestures are observed at wait-loop
//! iterations and phase boundaries, never preemptively mid-sample.

use crate::power::SleepMode;
use crate::sampler;
use crate::state::SharedState;
use crate::timing::{self, AbortOn, LONG_TIMEOUT, SHORT_TIMEOUT};

use super::events::ControllerEvent;
use super::failure::Verdict;
use super::ports::{ActuatorPort, AdcControlPort, EventSink, SleepPort};
use super::{Controller, Phase, PhaseOutcome};

impl Controller {
    /// Run one outer-loop iteration: calibrate, then cycle
    /// measure→pump→idle until a phase asks for recalibration or reports
    /// a confirmed failure. The returned outcome is the reason the cycle
    /// loop ended (never [`PhaseOutcome::Continue`]).
    ///
    /// Production wraps this in `loop { .. }` — a confirmed failure is an
    /// operator-intervention request, not a device halt.
    pub fn run_once(
        &mut self,
        shared: &SharedState,
        hw: &mut (impl ActuatorPort + AdcControlPort + SleepPort),
        sink: &mut impl EventSink,
    ) -> PhaseOutcome {
        self.calibrate(shared, hw, sink);
        loop {
            let outcome = self.measure_phase(shared, hw, sink);
            if outcome != PhaseOutcome::Continue {
                return outcome;
            }
            let outcome = self.pump_phase(shared, hw, sink);
            if outcome != PhaseOutcome::Continue {
                return outcome;
            }
            let outcome = self.idle_phase(shared, hw, sink);
            if outcome != PhaseOutcome::Continue {
                return outcome;
            }
        }
    }

    /// Calibration: sleep until the operator asserts the setup control,
    /// then pump for as long as the control is held (capped at the wait
    /// budget). The hold time, measured in short ticks, becomes the pump
    /// duration for every subsequent automatic cycle, and the goal value
    /// is flagged for re-derivation from the next measurement.
    ///
    /// This is the only place the pump duration is assigned.
    pub fn calibrate(
        &mut self,
        shared: &SharedState,
        hw: &mut (impl ActuatorPort + SleepPort),
        sink: &mut impl EventSink,
    ) {
        self.enter_phase(Phase::Calibrate, sink);

        // Deepest sleep, no timer armed: only the setup pin-change wakes us.
        while !shared.setup_active() {
            hw.sleep(SleepMode::Deep);
        }

        hw.pump_on();
        let remaining = timing::wait_ticks(
            shared,
            hw,
            self.cfg.max_wait_budget,
            SHORT_TIMEOUT,
            AbortOn::SetupEnd,
        );
        hw.pump_off();

        self.pump_ticks = self.cfg.max_wait_budget - remaining;
        // Consume the gesture even if the budget expired while still held.
        shared.set_setup_active(false);
        self.goal_reset_needed = true;

        sink.emit(&ControllerEvent::CalibrationDone {
            pump_ticks: self.pump_ticks,
        });
        log::info!(
            "calibration done: pump duration {} ticks (budget {})",
            self.pump_ticks,
            self.cfg.max_wait_budget
        );
    }

    /// Measurement: run the averaged sampler and shift the reading
    /// history. Re-derives the goal exactly once after a calibration.
    pub fn measure_phase(
        &mut self,
        shared: &SharedState,
        hw: &mut (impl ActuatorPort + AdcControlPort + SleepPort),
        sink: &mut impl EventSink,
    ) -> PhaseOutcome {
        self.enter_phase(Phase::Measure, sink);

        let value = sampler::measure(shared, hw, &self.cfg);
        self.prev = self.curr;
        self.curr = value;
        self.history.write(value);

        if self.goal_reset_needed {
            self.goal = value;
            self.goal_reset_needed = false;
            sink.emit(&ControllerEvent::GoalSet(value));
            log::info!("goal set to {}", value);
        }

        sink.emit(&ControllerEvent::Measurement {
            prev: self.prev,
            curr: self.curr,
            goal: self.goal,
        });

        if shared.setup_active() {
            PhaseOutcome::Recalibrate
        } else {
            PhaseOutcome::Continue
        }
    }

    /// Conditional pumping: only when the current reading exceeds the
    /// goal, and only after the failure policy clears it. The pump runs
    /// for exactly the calibrated duration unless a new setup gesture
    /// cuts it short.
    pub fn pump_phase(
        &mut self,
        shared: &SharedState,
        hw: &mut (impl ActuatorPort + SleepPort),
        sink: &mut impl EventSink,
    ) -> PhaseOutcome {
        self.enter_phase(Phase::Pump, sink);

        let before = self.failures.count();
        match self.failures.evaluate(self.prev, self.curr, self.goal) {
            Verdict::BelowGoal => {}
            Verdict::Confirmed => {
                sink.emit(&ControllerEvent::FailureConfirmed);
                log::warn!(
                    "confirmed actuation failure ({} non-improving readings), \
                     awaiting recalibration",
                    self.failures.count()
                );
                return PhaseOutcome::Failure;
            }
            Verdict::Pump => {
                let after = self.failures.count();
                if after > before {
                    sink.emit(&ControllerEvent::FailureEscalated(after));
                    log::warn!("reading not improving (strike {})", after);
                }

                hw.pump_on();
                let remaining = timing::wait_ticks(
                    shared,
                    hw,
                    self.pump_ticks,
                    SHORT_TIMEOUT,
                    AbortOn::SetupStart,
                );
                hw.pump_off();
                sink.emit(&ControllerEvent::PumpRun {
                    ticks: self.pump_ticks - remaining,
                });
            }
        }

        if shared.setup_active() {
            PhaseOutcome::Recalibrate
        } else {
            PhaseOutcome::Continue
        }
    }

    /// Idle: long-timeout sleep between automatic cycles, abortable by a
    /// new setup gesture. Completing the idle wait closes out the cycle
    /// and emits a telemetry snapshot.
    pub fn idle_phase(
        &mut self,
        shared: &SharedState,
        hw: &mut impl SleepPort,
        sink: &mut impl EventSink,
    ) -> PhaseOutcome {
        self.enter_phase(Phase::Idle, sink);

        timing::wait_ticks(
            shared,
            hw,
            self.cfg.idle_increments,
            LONG_TIMEOUT,
            AbortOn::SetupStart,
        );

        if shared.setup_active() {
            return PhaseOutcome::Recalibrate;
        }

        self.cycles_completed += 1;
        sink.emit(&ControllerEvent::Telemetry(self.telemetry()));
        PhaseOutcome::Continue
    }
}
