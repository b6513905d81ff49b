//! Badge Boot Dispatcher
//!
//! Runs once per power cycle on the startup context. It reads the RTC mode
//! register and either ends the boot in a one-shot action (OTA, companion
//! app, first-run provisioning) or launches the interpreter task and returns
//! to the scheduler.
//!
//! Ordering on every path:
//! 1. first-run check and base init (always)
//! 2. mode register read (both bytes) before any decision
//! 3. button sample before the safe-mode decision
//! 4. boot context fixed before the task is spawned

use alloc::format;
use alloc::sync::Arc;

use crate::boot::context::BootContext;
use crate::boot::reset::{classify, ResetCause};
use crate::boot::rtc::{BootMode, ModeRegister};
use crate::config::COMPANION_POLL_TIMEOUT_MS;
use crate::error::BootError;
use crate::hal::Board;
use crate::log::{log_err, log_info, log_warn};
use crate::sched::task::{TaskEntry, TaskHandle, TaskSpec};

/// Optional boot paths compiled into this image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootFeatures {
    pub companion_app: bool,
}

impl BootFeatures {
    pub const fn compiled() -> Self {
        Self { companion_app: cfg!(feature = "companion-app") }
    }
}

impl Default for BootFeatures {
    fn default() -> Self {
        Self::compiled()
    }
}

/// Something the dispatcher can turn into the pinned interpreter task.
pub trait Launch {
    fn spec(&self) -> TaskSpec;

    fn into_entry(self, ctx: Arc<BootContext>) -> TaskEntry;
}

/// How the boot path ended, when it returns at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    Interpreter {
        handle: TaskHandle,
        safe_mode: bool,
        cause: ResetCause,
    },
    FirstRun,
}

pub struct BootDispatcher<'b, B: Board + ?Sized, L: Launch> {
    board: &'b mut B,
    launcher: L,
    features: BootFeatures,
}

impl<'b, B: Board + ?Sized, L: Launch> BootDispatcher<'b, B, L> {
    pub fn new(board: &'b mut B, launcher: L) -> Self {
        Self::with_features(board, launcher, BootFeatures::compiled())
    }

    pub fn with_features(board: &'b mut B, launcher: L, features: BootFeatures) -> Self {
        Self { board, launcher, features }
    }

    /// The boot decision. Does not return on the OTA and companion-app paths.
    pub fn run(self) -> BootOutcome {
        self.board.check_first_run();
        self.board.base_init();

        let record = ModeRegister::read(&*self.board);
        match record.mode() {
            Some(mode) => {
                log_info("boot", &format!("mode register valid: {}", mode));
                self.dispatch_mode(mode)
            }
            None => {
                ::log::debug!(target: "boot", "mode register invalid ({:#04x}/{:#04x})", record.tag, record.check);
                self.cold_boot()
            }
        }
    }

    fn dispatch_mode(self, mode: BootMode) -> BootOutcome {
        match mode {
            BootMode::Ota => {
                log_info("boot", "Starting OTA");
                self.board.ota_update()
            }
            BootMode::CompanionApp if self.features.companion_app => {
                self.board.full_init();
                if self.board.button_state().is_empty() {
                    log_info("boot", "Starting companion app");
                    self.run_companion_app()
                } else {
                    log_info("boot", "Touch wake after companion app");
                    let cause = self.board.reset_cause();
                    self.launch(cause, false)
                }
            }
            BootMode::FirstRun => {
                self.board.first_run();
                BootOutcome::FirstRun
            }
            other => {
                log_warn("boot", &format!("no handler for mode {}, starting interpreter", other));
                let cause = self.board.reset_cause();
                self.launch(cause, false)
            }
        }
    }

    /// Companion app in the foreground until the first input event, then restart.
    fn run_companion_app(self) -> ! {
        self.board.companion_init();
        log_info("boot", "companion app started");
        while self.board.poll_event(COMPANION_POLL_TIMEOUT_MS) == 0 {}
        log_info("boot", "Touch detected. Exiting companion app, rebooting.");
        self.board.restart()
    }

    /// No trusted mode: classify the reset and maybe enter safe mode.
    fn cold_boot(self) -> BootOutcome {
        let cause = self.board.reset_cause();
        let board = &mut *self.board;
        let class = classify(cause, || {
            board.full_init();
            board.button_state()
        });
        if class.safe_mode {
            log_warn("boot", "safe mode requested, imports restricted");
        }
        log_info("boot", &format!("reset cause {}, safe mode {}", class.cause, class.safe_mode));
        self.launch(class.cause, class.safe_mode)
    }

    fn launch(self, cause: ResetCause, safe_mode: bool) -> BootOutcome {
        let ctx = Arc::new(BootContext::new(cause, safe_mode));
        let spec = self.launcher.spec();
        let entry = self.launcher.into_entry(ctx);
        match self.board.spawn_pinned(spec, entry) {
            Ok(handle) => {
                log_info("boot", &format!("started {} (prio {})", handle, spec.priority.level()));
                BootOutcome::Interpreter { handle, safe_mode, cause }
            }
            Err(err) => {
                log_err("boot", &format!("{}", BootError::from(err)));
                self.board.restart()
            }
        }
    }
}
