// kernel/src/boot.rs
//! Badge Boot Sequence
//!
//! Runs once per power cycle on the startup context:
//! - `rtc`: persisted mode register (tag + complement in RTC memory)
//! - `reset`: reset-cause decode, button mask, safe-mode classification
//! - `context`: the boot context shared with the interpreter task
//! - `dispatch`: the mode dispatcher that ends in a one-shot action or a launched task

pub mod context;
pub mod dispatch;
pub mod reset;
pub mod rtc;

pub use context::BootContext;
pub use dispatch::{BootDispatcher, BootFeatures, BootOutcome, Launch};
pub use reset::{ButtonMask, ResetCause};
pub use rtc::{BootMode, ModeRecord, ModeRegister};
