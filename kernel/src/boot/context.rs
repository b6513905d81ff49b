//! Badge Boot Context
//!
//! Built once by the dispatcher, then shared (`Arc`) with the interpreter task
//! and the import filter. `safe_mode` is fixed before the task exists, so
//! readers need no lock. `reset_cause` has a single writer: the supervisor's
//! teardown, recording the soft reset for the next cycle.

use spin::RwLock;

use crate::boot::reset::ResetCause;

#[derive(Debug)]
pub struct BootContext {
    safe_mode: bool,
    reset_cause: RwLock<ResetCause>,
}

impl BootContext {
    pub const fn new(reset_cause: ResetCause, safe_mode: bool) -> Self {
        Self {
            safe_mode,
            reset_cause: RwLock::new(reset_cause),
        }
    }

    #[inline]
    pub fn safe_mode(&self) -> bool {
        self.safe_mode
    }

    /// Proximate cause of the current interpreter cycle.
    pub fn reset_cause(&self) -> ResetCause {
        *self.reset_cause.read()
    }

    pub fn record_soft_reset(&self) {
        *self.reset_cause.write() = ResetCause::Soft;
    }
}
