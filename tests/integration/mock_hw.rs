//! Mock world for integration tests.
//!
//! The phase methods block: they suspend through [`SleepPort`] and expect
//! an interrupt to have changed something by the time they wake. The mock
//! therefore plays the world, not just the hardware — every `sleep()`
//! call applies what the relevant interrupt handler would have done:
//!
//! - deep sleep with a timer armed ticks the shared countdown;
//! - ADC-idle sleep accumulates one conversion at the current probe value;
//! - a scripted operator gesture flips the setup flag instead.
//!
//! Actuator calls are recorded so tests can assert on the full command
//! history without touching real GPIO registers.

use std::collections::VecDeque;

use autowater::controller::events::ControllerEvent;
use autowater::controller::ports::{ActuatorPort, AdcControlPort, EventSink, SleepPort};
use autowater::power::SleepMode;
use autowater::state::SharedState;
use autowater::timing::TimeoutClass;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    PumpOn,
    PumpOff,
    SensorOn,
    SensorOff,
    AdcOn,
    AdcOff,
    AllOff,
}

// ── Operator gestures ─────────────────────────────────────────

/// When the simulated operator reaches for the setup control.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Press at the next deep suspension (the calibration entry wait).
    Immediate,
    /// Press during a long-timeout (idle) wait, after skipping the first
    /// `skip` idle waits.
    OnLongWait { skip: u8 },
    /// Press while an automatic pump run is in progress, once it has
    /// consumed `after_ticks` ticks.
    WhilePumping { after_ticks: u8 },
}

/// One press-and-hold: pressed at `trigger`, released after `hold_ticks`
/// timer ticks have elapsed under the hold.
#[derive(Debug, Clone, Copy)]
pub struct Gesture {
    pub trigger: Trigger,
    pub hold_ticks: u8,
}

#[allow(dead_code)]
impl Gesture {
    pub fn immediate(hold_ticks: u8) -> Self {
        Self {
            trigger: Trigger::Immediate,
            hold_ticks,
        }
    }

    pub fn on_idle(skip: u8, hold_ticks: u8) -> Self {
        Self {
            trigger: Trigger::OnLongWait { skip },
            hold_ticks,
        }
    }

    pub fn while_pumping(after_ticks: u8, hold_ticks: u8) -> Self {
        Self {
            trigger: Trigger::WhilePumping { after_ticks },
            hold_ticks,
        }
    }
}

// ── MockWorld ─────────────────────────────────────────────────

pub struct MockWorld<'a> {
    shared: &'a SharedState,
    /// Pending operator gestures, consumed front to back.
    plan: VecDeque<Gesture>,
    /// Ticks left before the current hold releases.
    holding: Option<u8>,
    /// Probe value for each successive measurement; the last one repeats.
    readings: VecDeque<u8>,
    current_adc: u8,
    armed: Option<TimeoutClass>,
    /// Distinct long-timeout waits seen so far (one per idle phase).
    long_waits: u8,
    /// Long-timeout arms recorded per distinct wait; the wait primitive
    /// re-arms before every suspension, so a full idle shows one entry
    /// per increment.
    pub long_wait_arms: Vec<u8>,
    /// Timer ticks consumed by the pump run in progress.
    pump_run_ticks: u8,
    pump_running: bool,
    pub calls: Vec<ActuatorCall>,
    pub sleeps: u64,
}

#[allow(dead_code)]
impl<'a> MockWorld<'a> {
    pub fn new(shared: &'a SharedState) -> Self {
        Self {
            shared,
            plan: VecDeque::new(),
            holding: None,
            readings: VecDeque::new(),
            current_adc: 128,
            armed: None,
            long_waits: 0,
            long_wait_arms: Vec::new(),
            pump_run_ticks: 0,
            pump_running: false,
            calls: Vec::new(),
            sleeps: 0,
        }
    }

    pub fn with_gestures(mut self, gestures: impl IntoIterator<Item = Gesture>) -> Self {
        self.plan.extend(gestures);
        self
    }

    /// Queue the averaged probe value each successive measurement sees.
    pub fn with_readings(mut self, readings: impl IntoIterator<Item = u8>) -> Self {
        self.readings.extend(readings);
        self
    }

    pub fn pump_on_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == ActuatorCall::PumpOn)
            .count()
    }

    fn timer_tick(&mut self) {
        if self.armed.is_some() {
            self.shared.timer_tick();
            if self.pump_running && !self.shared.setup_active() {
                self.pump_run_ticks += 1;
            }
        }
    }

    /// Returns true when a gesture fired (pin-change wake, no timer tick).
    fn operator_step(&mut self) -> bool {
        if self.shared.setup_active() {
            match self.holding {
                Some(0) => {
                    self.shared.set_setup_active(false);
                    self.holding = None;
                    return true;
                }
                Some(h) => {
                    self.holding = Some(h - 1);
                    return false;
                }
                None => return false,
            }
        }

        let fires = match self.plan.front() {
            Some(g) => match g.trigger {
                Trigger::Immediate => true,
                Trigger::OnLongWait { skip } => {
                    self.armed == Some(TimeoutClass::S8)
                        && self.shared.ticks_remaining() > 0
                        && self.long_waits > skip
                }
                Trigger::WhilePumping { after_ticks } => {
                    self.pump_running && self.pump_run_ticks >= after_ticks
                }
            },
            None => false,
        };
        if fires {
            let g = self.plan.pop_front().unwrap_or_else(|| unreachable!());
            self.shared.set_setup_active(true);
            self.holding = Some(g.hold_ticks);
            return true;
        }
        false
    }
}

impl ActuatorPort for MockWorld<'_> {
    fn pump_on(&mut self) {
        self.pump_running = true;
        self.pump_run_ticks = 0;
        self.calls.push(ActuatorCall::PumpOn);
    }

    fn pump_off(&mut self) {
        self.pump_running = false;
        self.calls.push(ActuatorCall::PumpOff);
    }

    fn sensor_on(&mut self) {
        self.calls.push(ActuatorCall::SensorOn);
    }

    fn sensor_off(&mut self) {
        self.calls.push(ActuatorCall::SensorOff);
    }

    fn is_pumping(&self) -> bool {
        self.pump_running
    }

    fn all_off(&mut self) {
        self.pump_running = false;
        self.calls.push(ActuatorCall::AllOff);
    }
}

impl AdcControlPort for MockWorld<'_> {
    fn adc_enable(&mut self) {
        // A new measurement window: advance to its scripted probe value.
        if let Some(v) = self.readings.pop_front() {
            self.current_adc = v;
        }
        self.calls.push(ActuatorCall::AdcOn);
    }

    fn adc_disable(&mut self) {
        self.calls.push(ActuatorCall::AdcOff);
    }
}

impl SleepPort for MockWorld<'_> {
    fn arm_timer(&mut self, class: TimeoutClass) {
        if class == TimeoutClass::S8 {
            if self.armed == Some(TimeoutClass::S8) {
                if let Some(last) = self.long_wait_arms.last_mut() {
                    *last += 1;
                }
            } else {
                self.long_waits += 1;
                self.long_wait_arms.push(1);
            }
        }
        self.armed = Some(class);
    }

    fn sleep(&mut self, mode: SleepMode) {
        self.sleeps += 1;
        assert!(
            self.sleeps < 100_000,
            "mock world: runaway control loop (check gesture/reading scripts)"
        );
        match mode {
            SleepMode::AdcIdle => self.shared.adc_sample(self.current_adc),
            SleepMode::Deep => {
                if !self.operator_step() {
                    self.timer_tick();
                }
            }
        }
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<ControllerEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&ControllerEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn contains(&self, event: &ControllerEvent) -> bool {
        self.events.contains(event)
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControllerEvent) {
        self.events.push(event.clone());
    }
}
