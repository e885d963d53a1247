//! Interrupt-shared controller state.
//!
//! The three runtime counters that interrupt handlers mutate live together
//! in [`SharedState`], one atomic per field, with a documented single-writer
//! discipline:
//!
//! | Field          | ISR writer            | Main-flow writes          |
//! |----------------|-----------------------|---------------------------|
//! | `ticks`        | timer tick (decrement)| set before sleeping       |
//! | `sample_sum`   | ADC conversion        | reset at measurement start|
//! | `sample_count` | ADC conversion        | reset at measurement start|
//! | `setup_active` | pin-change (level)    | cleared after calibration |
//!
//! The main flow only reads a field after a wake-up, never while asleep, so
//! relaxed-ish acquire/release atomics are all the synchronisation needed —
//! the same lock-free discipline used for every ISR-to-main handoff in this
//! codebase.
//!
//! Production code uses the [`SHARED`] static (ISR callbacks can't carry a
//! reference); tests construct their own instances.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};

/// Counters shared between interrupt context and the main control flow.
pub struct SharedState {
    /// Remaining wait units for the cooperative delay.
    ticks: AtomicU8,
    /// Running sum of ADC sample high bytes for the current measurement.
    sample_sum: AtomicU16,
    /// Number of samples accumulated for the current measurement.
    sample_count: AtomicU8,
    /// Level of the operator control: `true` while the button is held.
    setup_active: AtomicBool,
}

/// The one instance wired to real interrupt handlers.
pub static SHARED: SharedState = SharedState::new();

impl SharedState {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU8::new(0),
            sample_sum: AtomicU16::new(0),
            sample_count: AtomicU8::new(0),
            setup_active: AtomicBool::new(false),
        }
    }

    // ── Tick counter ──────────────────────────────────────────

    /// Load a fresh countdown. Main flow only, before suspending.
    pub fn set_ticks(&self, n: u8) {
        self.ticks.store(n, Ordering::Release);
    }

    pub fn ticks_remaining(&self) -> u8 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Timer interrupt entry: decrement the countdown by one.
    /// Saturates at zero — a late interrupt after a wait loop has already
    /// exited must not wrap the counter.
    pub fn timer_tick(&self) {
        let _ = self
            .ticks
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| {
                t.checked_sub(1)
            });
    }

    // ── Sample accumulator ────────────────────────────────────

    /// Reset the accumulator. Main flow only, at measurement start.
    pub fn reset_samples(&self) {
        self.sample_sum.store(0, Ordering::Release);
        self.sample_count.store(0, Ordering::Release);
    }

    /// ADC conversion-complete interrupt entry: accumulate one sample's
    /// high byte.
    pub fn adc_sample(&self, high_byte: u8) {
        self.sample_sum
            .fetch_add(u16::from(high_byte), Ordering::AcqRel);
        self.sample_count.fetch_add(1, Ordering::AcqRel);
    }

    pub fn sample_count(&self) -> u8 {
        self.sample_count.load(Ordering::Acquire)
    }

    /// Truncated integer average of the accumulated samples.
    /// Callers must not read this before the sample total is reached.
    pub fn sample_average(&self) -> u8 {
        let count = u16::from(self.sample_count.load(Ordering::Acquire));
        if count == 0 {
            return 0;
        }
        (self.sample_sum.load(Ordering::Acquire) / count) as u8
    }

    // ── Setup flag ────────────────────────────────────────────

    /// Pin-change interrupt entry: record the operator control level
    /// (`true` = pressed). Also used by the calibration phase to consume
    /// the flag once the setup gesture has been handled.
    pub fn set_setup_active(&self, active: bool) {
        self.setup_active.store(active, Ordering::Release);
    }

    pub fn setup_active(&self) -> bool {
        self.setup_active.load(Ordering::Acquire)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
