//! Badge Boot Core: Mode Dispatch & Interpreter Supervision
//!
//! This is the power-on path of the badge firmware. It performs:
//! - Persisted mode dispatch from battery-backed RTC memory (OTA, companion app, first run)
//! - Reset-cause classification and safe-mode entry from a live button sample
//! - Safe-mode import sandboxing for the interpreter's module resolver
//! - The interpreter task: arenas, startup scripts, REPL loop and soft-reset recycling
//!
//! Hardware and firmware services live behind the traits in [`hal`]; the board
//! glue implements them and hands a [`boot::BootDispatcher`] to the startup context.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// Subsystem modules
pub mod boot;
pub mod config;
pub mod error;
pub mod hal;
pub mod log;
pub mod memory;
pub mod modules;
pub mod runtime;
pub mod sched;

pub use boot::{BootContext, BootDispatcher, BootFeatures, BootOutcome};
pub use error::{BootError, RuntimeFault, SpawnError};
pub use modules::sandbox::{ImportFilter, SandboxPolicy};
pub use modules::vfs::{ImportStat, VfsStat};
pub use runtime::supervisor::{InterpreterTask, Supervisor};
