//! Cooperative delay primitive.
//!
//! The controller never busy-waits: a phase loads the shared tick counter,
//! arms a low-frequency periodic timer, and suspends until an interrupt
//! fires. Each timer interrupt decrements the counter by one; the phase
//! re-checks after every wake-up and goes back to sleep until the counter
//! reaches zero or its abort condition flips.
//!
//! ```text
//!   wait_ticks(n) ──▶ set counter = n
//!        │
//!        ▼
//!   ┌─ loop ───────────────────────────────┐
//!   │ counter == 0?            → done      │
//!   │ abort condition?         → early out │
//!   │ arm_timer(class); sleep(Deep)        │
//!   └──────────────────────────────────────┘
//! ```

use crate::controller::ports::SleepPort;
use crate::power::SleepMode;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Timeout classes
// ---------------------------------------------------------------------------

/// Discrete periodic-timer intervals, power-of-two scaled from 16 ms to 8 s.
/// This is the full low-power watchdog prescaler table; the controller only
/// ever arms [`SHORT_TIMEOUT`] and [`LONG_TIMEOUT`], but drivers accept any
/// class so the encoding stays decoupled from policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimeoutClass {
    Ms16 = 0,
    Ms32 = 1,
    Ms64 = 2,
    Ms125 = 3,
    Ms250 = 4,
    Ms500 = 5,
    S1 = 6,
    S2 = 7,
    S4 = 8,
    S8 = 9,
}

impl TimeoutClass {
    /// Nominal interval in milliseconds.
    pub const fn millis(self) -> u32 {
        match self {
            Self::Ms16 => 16,
            Self::Ms32 => 32,
            Self::Ms64 => 64,
            Self::Ms125 => 125,
            Self::Ms250 => 250,
            Self::Ms500 => 500,
            Self::S1 => 1_000,
            Self::S2 => 2_000,
            Self::S4 => 4_000,
            Self::S8 => 8_000,
        }
    }

    /// Hardware prescaler index (0–9) for register-level timer drivers.
    pub const fn prescaler_index(self) -> u8 {
        self as u8
    }
}

/// Tick length used for calibration, sensor settling, and pumping.
pub const SHORT_TIMEOUT: TimeoutClass = TimeoutClass::Ms250;

/// Tick length used for the idle phase between cycles.
pub const LONG_TIMEOUT: TimeoutClass = TimeoutClass::S8;

// ---------------------------------------------------------------------------
// Wait primitive
// ---------------------------------------------------------------------------

/// Early-exit condition for [`wait_ticks`].
///
/// The calibration countdown runs *while* the operator holds the control
/// (aborts when setup ends); pumping and idling run *unless* a new setup
/// gesture begins. The sensor-settling delay is uninterruptible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortOn {
    /// Run the full countdown regardless of the setup flag.
    Never,
    /// Exit early when the setup flag becomes true.
    SetupStart,
    /// Exit early when the setup flag becomes false.
    SetupEnd,
}

impl AbortOn {
    fn triggered(self, shared: &SharedState) -> bool {
        match self {
            Self::Never => false,
            Self::SetupStart => shared.setup_active(),
            Self::SetupEnd => !shared.setup_active(),
        }
    }
}

/// Sleep for `n` ticks of `class`, or until `abort` triggers.
///
/// Returns the ticks still outstanding: `0` after a full countdown, the
/// leftover count after an early exit. The shared counter is left holding
/// the same value — an aborted wait does not force-reset it. This primitive
/// cannot fail; callers that care about the abort cause re-check the setup
/// flag themselves.
pub fn wait_ticks(
    shared: &SharedState,
    hw: &mut impl SleepPort,
    n: u8,
    class: TimeoutClass,
    abort: AbortOn,
) -> u8 {
    shared.set_ticks(n);
    loop {
        if shared.ticks_remaining() == 0 || abort.triggered(shared) {
            return shared.ticks_remaining();
        }
        // One-shot interrupt source: re-arm before every suspension.
        hw.arm_timer(class);
        hw.sleep(SleepMode::Deep);
    }
}
