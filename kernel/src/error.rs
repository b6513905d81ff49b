//! Badge Boot Error Types
//!
//! Only the unrecoverable tier surfaces as a value: a corrupt or unset mode
//! register is a normal boot path, and REPL errors stay inside the runtime.

use thiserror::Error;

/// Unrecoverable interpreter failure (a non-local exit with no handler).
///
/// Returned from runtime init, startup scripts and REPL drivers. The supervisor
/// hands it to [`crate::runtime::fault::fatal`], which restarts the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{reason} (val={value:#x})")]
pub struct RuntimeFault {
    /// Opaque value the runtime attached to the failed jump.
    pub value: usize,
    pub reason: &'static str,
}

impl RuntimeFault {
    pub const fn new(value: usize, reason: &'static str) -> Self {
        Self { value, reason }
    }

    /// The runtime tried to unwind with no handler installed.
    pub const fn nlr_jump_failed(value: usize) -> Self {
        Self::new(value, "NLR jump failed")
    }
}

/// Failure to create the pinned interpreter task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("no task control block available for '{0}'")]
    NoControlBlock(&'static str),
    #[error("core {0} is not available for pinning")]
    InvalidCore(u8),
    #[error("stack arena of {0} bytes is too small")]
    StackTooSmall(usize),
}

/// Boot-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BootError {
    #[error("interpreter task spawn failed: {0}")]
    Spawn(#[from] SpawnError),
    #[error("console logger already installed")]
    LoggerInstalled,
}
