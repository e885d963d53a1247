//! Fuzz target: `FailureTracker::evaluate`
//!
//! Drives arbitrary reading sequences through the failure policy and checks
//! the invariants the control loop relies on: the counter only reports
//! `Confirmed` once it strictly exceeds the maximum, and any at-or-below-goal
//! reading resets it to zero.
//!
//! cargo fuzz run fuzz_failure_tracker

#![no_main]

use autowater::controller::failure::{FailureTracker, Verdict};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&goal, rest)) = data.split_first() else {
        return;
    };
    let Some((&max, readings)) = rest.split_first() else {
        return;
    };

    let mut tracker = FailureTracker::new(max);
    let mut prev = goal;
    for &curr in readings {
        let verdict = tracker.evaluate(prev, curr, goal);
        match verdict {
            Verdict::BelowGoal => {
                assert!(curr <= goal);
                assert_eq!(tracker.count(), 0);
            }
            Verdict::Pump => {
                assert!(curr > goal);
                assert!(tracker.count() <= max);
            }
            Verdict::Confirmed => {
                assert!(curr > goal);
                assert!(tracker.count() > max);
            }
        }
        prev = curr;
    }
});
