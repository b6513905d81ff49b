//! Badge Interpreter Runtime Seam
//!
//! The embedded interpreter is a collaborator: the supervisor drives it
//! through [`Runtime`] and never reaches into its object model.
//!
//! - [`supervisor`]: the perpetual interpreter task (Init → Start → Run → Teardown)
//! - [`fault`]: unrecoverable-fault handling (diagnostic + device restart)

pub mod fault;
pub mod supervisor;

pub use fault::fatal;
pub use supervisor::{InterpreterTask, Phase, Supervisor};

use crate::error::RuntimeFault;
use crate::memory::arena::StackArena;
use crate::memory::heap::HeapArena;
use crate::modules::sandbox::ImportFilter;

/// REPL flavour selected by the interpreter's own configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    Raw,
    Friendly,
}

/// What a REPL driver asked for when it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplSignal {
    /// Keep looping (driver returned zero).
    Continue,
    /// Leave the Run phase and soft-reset (driver returned non-zero).
    Exit,
}

impl ReplSignal {
    pub const fn from_code(code: i32) -> Self {
        if code == 0 {
            ReplSignal::Continue
        } else {
            ReplSignal::Exit
        }
    }
}

/// Result of running a frozen startup script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    Ran,
    /// No frozen module with that name.
    Missing,
}

pub trait Runtime: Send {
    fn set_stack_top(&mut self, top: usize);

    fn set_stack_limit(&mut self, limit: usize);

    /// Cold init over a freshly reset heap. `imports` resolves every module path.
    fn init(&mut self, heap: &'static HeapArena, imports: ImportFilter) -> Result<(), RuntimeFault>;

    fn set_sys_path(&mut self, path: &[&'static str]);

    fn clear_argv(&mut self);

    /// Line editing / REPL history.
    fn readline_init(&mut self);

    fn exec_mode(&self) -> ReplMode;

    fn exec_frozen(&mut self, name: &str) -> Result<ExecStatus, RuntimeFault>;

    fn raw_repl(&mut self) -> Result<ReplSignal, RuntimeFault>;

    fn friendly_repl(&mut self) -> Result<ReplSignal, RuntimeFault>;

    fn stdout_write(&mut self, text: &str);

    /// Quiesce interpreter state. The arenas are kept.
    fn deinit(&mut self);

    fn flush(&mut self) {}

    /// Register the task stack with the threading layer.
    fn thread_init(&mut self, _stack: StackArena) {}

    fn thread_deinit(&mut self) {}
}
