//! Full control-cycle tests: calibration through measure→pump→idle against
//! the mock world, including the failure policy and mid-cycle setup
//! gestures.

use autowater::config::SystemConfig;
use autowater::controller::events::ControllerEvent;
use autowater::controller::ports::ActuatorPort;
use autowater::controller::{Controller, PhaseOutcome};
use autowater::state::SharedState;

use crate::mock_hw::{Gesture, MockWorld, RecordingSink};

#[test]
fn below_goal_cycle_never_pumps() {
    let shared = SharedState::new();
    let mut hw = MockWorld::new(&shared)
        .with_gestures([Gesture::immediate(3), Gesture::on_idle(0, 0)])
        .with_readings([100]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());
    controller.start(&mut sink);

    let outcome = controller.run_once(&shared, &mut hw, &mut sink);

    assert_eq!(outcome, PhaseOutcome::Recalibrate);
    assert_eq!(sink.events[0], ControllerEvent::Started);
    // Goal derives from the first post-calibration reading, so that
    // reading can never be above goal: only the calibration hold pumped.
    assert_eq!(hw.pump_on_count(), 1);
    assert!(sink.contains(&ControllerEvent::GoalSet(100)));
    assert!(sink.contains(&ControllerEvent::Measurement {
        prev: 0,
        curr: 100,
        goal: 100,
    }));
}

#[test]
fn dry_reading_pumps_for_calibrated_duration() {
    let shared = SharedState::new();
    let mut hw = MockWorld::new(&shared)
        .with_gestures([Gesture::immediate(4), Gesture::on_idle(1, 0)])
        .with_readings([50, 60, 55]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    let outcome = controller.run_once(&shared, &mut hw, &mut sink);

    assert_eq!(outcome, PhaseOutcome::Recalibrate);
    // Calibration hold + one automatic run.
    assert_eq!(hw.pump_on_count(), 2);
    assert!(sink.contains(&ControllerEvent::PumpRun { ticks: 4 }));
    assert_eq!(controller.cycles_completed(), 1);
}

#[test]
fn uninterrupted_idle_arms_long_timeout_per_increment() {
    let shared = SharedState::new();
    let cfg = SystemConfig::default();
    // Reading stays at goal, so run one full idle and abort the second.
    let mut hw = MockWorld::new(&shared)
        .with_gestures([Gesture::immediate(3), Gesture::on_idle(1, 0)])
        .with_readings([100]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(cfg.clone());

    let outcome = controller.run_once(&shared, &mut hw, &mut sink);

    assert_eq!(outcome, PhaseOutcome::Recalibrate);
    // The full idle re-arms the long timeout once per increment, no more;
    // the interrupted one stops after a single arm.
    assert_eq!(hw.long_wait_arms.len(), 2);
    assert_eq!(hw.long_wait_arms[0], cfg.idle_increments);
    assert_eq!(hw.long_wait_arms[1], 1);
    assert_eq!(hw.pump_on_count(), 1);
}

#[test]
fn failure_confirmed_after_three_strikes() {
    let shared = SharedState::new();
    // Goal lands at 50; every later reading sits at 60 and never improves.
    let mut hw = MockWorld::new(&shared)
        .with_gestures([Gesture::immediate(3)])
        .with_readings([50, 60, 60, 60, 60]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    let outcome = controller.run_once(&shared, &mut hw, &mut sink);

    assert_eq!(outcome, PhaseOutcome::Failure);
    assert!(sink.contains(&ControllerEvent::FailureEscalated(1)));
    assert!(sink.contains(&ControllerEvent::FailureEscalated(2)));
    assert!(sink.contains(&ControllerEvent::FailureConfirmed));
    // Calibration + the first elevated reading + two strikes; the
    // confirming cycle must not actuate.
    assert_eq!(hw.pump_on_count(), 4);
    assert_eq!(controller.cycles_completed(), 4);
    assert_eq!(
        sink.count(|e| matches!(e, ControllerEvent::Telemetry(_))),
        4
    );
}

#[test]
fn recalibration_rederives_goal_and_duration() {
    let shared = SharedState::new();
    let mut hw = MockWorld::new(&shared)
        .with_gestures([
            Gesture::immediate(4),
            Gesture::on_idle(0, 6),
            Gesture::on_idle(0, 0),
        ])
        .with_readings([100, 90]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    assert_eq!(
        controller.run_once(&shared, &mut hw, &mut sink),
        PhaseOutcome::Recalibrate
    );
    assert_eq!(controller.pump_ticks(), 4);

    // The gesture is still held going into the second run: calibration
    // starts pumping immediately and re-times the hold.
    assert_eq!(
        controller.run_once(&shared, &mut hw, &mut sink),
        PhaseOutcome::Recalibrate
    );
    assert_eq!(controller.pump_ticks(), 6);

    assert!(sink.contains(&ControllerEvent::GoalSet(100)));
    assert!(sink.contains(&ControllerEvent::GoalSet(90)));
}

#[test]
fn setup_during_pump_cuts_the_run_short() {
    let shared = SharedState::new();
    let mut hw = MockWorld::new(&shared)
        .with_gestures([Gesture::immediate(4), Gesture::while_pumping(2, 0)])
        .with_readings([50, 60]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    let outcome = controller.run_once(&shared, &mut hw, &mut sink);

    assert_eq!(outcome, PhaseOutcome::Recalibrate);
    assert!(sink.contains(&ControllerEvent::PumpRun { ticks: 2 }));
    assert!(
        !hw.is_pumping(),
        "pump output must be cut on an aborted run"
    );
}

#[test]
fn failure_counter_clears_after_recalibration_goal_reset() {
    let shared = SharedState::new();
    // First run escalates once, then the operator recalibrates; after the
    // goal reset the first reading lands below goal and clears the count.
    let mut hw = MockWorld::new(&shared)
        .with_gestures([
            Gesture::immediate(3),
            Gesture::on_idle(2, 2),
            Gesture::on_idle(0, 0),
        ])
        .with_readings([50, 60, 60, 70, 70]);
    let mut sink = RecordingSink::new();
    let mut controller = Controller::new(SystemConfig::default());

    assert_eq!(
        controller.run_once(&shared, &mut hw, &mut sink),
        PhaseOutcome::Recalibrate
    );
    assert_eq!(controller.failure_count(), 1);

    assert_eq!(
        controller.run_once(&shared, &mut hw, &mut sink),
        PhaseOutcome::Recalibrate
    );
    assert_eq!(controller.failure_count(), 0);
    assert!(sink.contains(&ControllerEvent::GoalSet(70)));
}
