//! Calibration protocol tests.
//!
//! Covers the hold-to-pump setup gesture: the hold duration becomes the
//! pump duration, capped by the wait budget, re-armed on every new
//! gesture, and the setup flag is always consumed on exit.

use autowater::config::SystemConfig;
use autowater::controller::events::ControllerEvent;
use autowater::controller::Controller;
use autowater::state::SharedState;

use crate::mock_hw::{ActuatorCall, Gesture, MockWorld, RecordingSink};

#[test]
fn hold_duration_becomes_pump_duration() {
    let shared = SharedState::new();
    let mut hw = MockWorld::new(&shared).with_gestures([Gesture::immediate(5)]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    controller.calibrate(&shared, &mut hw, &mut sink);

    assert_eq!(controller.pump_ticks(), 5);
    assert_eq!(hw.calls, vec![ActuatorCall::PumpOn, ActuatorCall::PumpOff]);
    assert!(sink.contains(&ControllerEvent::CalibrationDone { pump_ticks: 5 }));
}

#[test]
fn setup_flag_is_consumed_even_after_budget_expiry() {
    let shared = SharedState::new();
    // Operator never lets go within the budget.
    let mut hw = MockWorld::new(&shared).with_gestures([Gesture::immediate(255)]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    controller.calibrate(&shared, &mut hw, &mut sink);

    assert_eq!(controller.pump_ticks(), 80);
    assert!(
        !shared.setup_active(),
        "an expired hold must not retrigger calibration"
    );
}

#[test]
fn momentary_tap_calibrates_zero_pumping() {
    let shared = SharedState::new();
    let mut hw = MockWorld::new(&shared).with_gestures([Gesture::immediate(0)]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    controller.calibrate(&shared, &mut hw, &mut sink);

    assert_eq!(controller.pump_ticks(), 0);
    // The pump output still cycles: energised at press, cut at release.
    assert_eq!(hw.calls, vec![ActuatorCall::PumpOn, ActuatorCall::PumpOff]);
}

#[test]
fn new_gesture_overwrites_previous_duration() {
    let shared = SharedState::new();
    let mut hw =
        MockWorld::new(&shared).with_gestures([Gesture::immediate(5), Gesture::immediate(12)]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    controller.calibrate(&shared, &mut hw, &mut sink);
    assert_eq!(controller.pump_ticks(), 5);

    controller.calibrate(&shared, &mut hw, &mut sink);
    assert_eq!(controller.pump_ticks(), 12);

    assert!(sink.contains(&ControllerEvent::CalibrationDone { pump_ticks: 5 }));
    assert!(sink.contains(&ControllerEvent::CalibrationDone { pump_ticks: 12 }));
}

#[test]
fn custom_budget_caps_the_hold() {
    let shared = SharedState::new();
    let cfg = SystemConfig {
        max_wait_budget: 10,
        ..SystemConfig::default()
    };
    let mut hw = MockWorld::new(&shared).with_gestures([Gesture::immediate(30)]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(cfg);

    controller.calibrate(&shared, &mut hw, &mut sink);
    assert_eq!(controller.pump_ticks(), 10);
}
