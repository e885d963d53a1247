//! Actuation-failure policy.
//!
//! A single elevated reading may be sensor noise or water still settling;
//! two consecutive non-improving elevated readings point at an ineffective
//! pump, an empty reservoir, or blocked tubing. The tracker escalates a
//! counter on the latter pattern and reports a confirmed failure once the
//! counter *strictly exceeds* the configured maximum: with the default
//! of two, three escalations (four elevated readings) happen before
//! actuation halts.

/// Result of evaluating one measurement pair against the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Current reading is at or below goal; nothing to do, counter reset.
    BelowGoal,
    /// Above goal; pumping should proceed.
    Pump,
    /// Above goal and the failure counter crossed the threshold; do not
    /// actuate, hand control back to the operator.
    Confirmed,
}

/// Tracks consecutive non-improving above-goal measurements.
#[derive(Debug, Clone)]
pub struct FailureTracker {
    count: u8,
    max_failures: u8,
}

impl FailureTracker {
    pub fn new(max_failures: u8) -> Self {
        Self {
            count: 0,
            max_failures,
        }
    }

    /// Evaluate the latest measurement pair.
    ///
    /// Escalates only when both hold: `curr >= prev` (not improving) and
    /// `prev > goal` (this is the second consecutive bad reading).
    /// Any improvement, or a first bad reading, resets the counter.
    ///
    /// The counter is intentionally *not* cleared on a confirmed failure:
    /// recalibration re-derives the goal from the next measurement, which
    /// lands that measurement on the `BelowGoal` path and resets it there.
    pub fn evaluate(&mut self, prev: u8, curr: u8, goal: u8) -> Verdict {
        if curr <= goal {
            self.count = 0;
            return Verdict::BelowGoal;
        }
        if curr >= prev && prev > goal {
            self.count = self.count.saturating_add(1);
            if self.count > self.max_failures {
                return Verdict::Confirmed;
            }
        } else {
            self.count = 0;
        }
        Verdict::Pump
    }

    /// Consecutive escalations recorded so far.
    pub fn count(&self) -> u8 {
        self.count
    }
}
