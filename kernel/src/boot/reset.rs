//! Badge Reset-Cause Classifier
//!
//! Decodes the ROM reset reason and decides safe-mode entry from a one-shot
//! button sample. Safe mode is only offered on a full boot: a deep-sleep wake
//! never samples the buttons.

use core::fmt;

use crate::config::SAFE_MODE_BUTTONS;

/// Why the boot CPU last came out of reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCause {
    PowerOn,
    /// External reset pin or CPU reset request.
    Hard,
    Software,
    Watchdog,
    DeepSleep,
    Brownout,
    /// Interpreter soft reset (recorded by the supervisor, never read from ROM).
    Soft,
    Other(u32),
}

impl ResetCause {
    /// Decode the ROM `rtc_get_reset_reason` code of CPU 0.
    pub const fn from_rom_code(code: u32) -> Self {
        match code {
            1 => ResetCause::PowerOn,
            3 | 12 => ResetCause::Software,
            4 | 7 | 8 | 9 | 11 | 13 | 16 => ResetCause::Watchdog,
            5 => ResetCause::DeepSleep,
            14 => ResetCause::Hard,
            15 => ResetCause::Brownout,
            other => ResetCause::Other(other),
        }
    }

    /// Value the interpreter's `machine.reset_cause()` reports.
    pub const fn machine_code(self) -> u8 {
        match self {
            ResetCause::PowerOn | ResetCause::Brownout | ResetCause::Other(_) => 1,
            ResetCause::Hard | ResetCause::Software => 2,
            ResetCause::Watchdog => 3,
            ResetCause::DeepSleep => 4,
            ResetCause::Soft => 5,
        }
    }

    #[inline]
    pub const fn is_deep_sleep_wake(self) -> bool {
        matches!(self, ResetCause::DeepSleep)
    }
}

impl fmt::Display for ResetCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetCause::PowerOn => f.write_str("power-on"),
            ResetCause::Hard => f.write_str("hard"),
            ResetCause::Software => f.write_str("software"),
            ResetCause::Watchdog => f.write_str("watchdog"),
            ResetCause::DeepSleep => f.write_str("deep-sleep"),
            ResetCause::Brownout => f.write_str("brownout"),
            ResetCause::Soft => f.write_str("soft"),
            ResetCause::Other(c) => write!(f, "other({})", c),
        }
    }
}

bitflags::bitflags! {
    /// Badge buttons, one bit per button index.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonMask: u32 {
        const UP     = 1 << 1;
        const DOWN   = 1 << 2;
        const LEFT   = 1 << 3;
        const RIGHT  = 1 << 4;
        const A      = 1 << 5;
        const B      = 1 << 6;
        const SELECT = 1 << 7;
        const START  = 1 << 8;
        const FLASH  = 1 << 9;
    }
}

/// Outcome of cold-boot classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub cause: ResetCause,
    /// `None` when the buttons were not sampled (deep-sleep wake).
    pub sample: Option<ButtonMask>,
    pub safe_mode: bool,
}

/// Safe mode iff the sample equals the safe-mode combination exactly.
#[inline]
pub fn is_safe_mode_combo(sample: ButtonMask) -> bool {
    sample == SAFE_MODE_BUTTONS
}

/// Classify a boot with no trusted mode register.
///
/// `sample` is only invoked for non-deep-sleep causes; the caller performs full
/// board init inside it before reading the buttons.
pub fn classify(cause: ResetCause, sample: impl FnOnce() -> ButtonMask) -> Classification {
    if cause.is_deep_sleep_wake() {
        return Classification { cause, sample: None, safe_mode: false };
    }
    let buttons = sample();
    Classification {
        cause,
        sample: Some(buttons),
        safe_mode: is_safe_mode_combo(buttons),
    }
}
