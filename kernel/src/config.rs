//! Badge Boot Configuration
//!
//! Compile-time constants of the boot core. Optional boot paths are selected
//! with Cargo features (`companion-app`, `thread`) and surfaced at runtime
//! through [`crate::boot::BootFeatures`].

use crate::boot::reset::ButtonMask;
use crate::sched::task::Priority;

// ───────────────────────────── Interpreter task ─────────────────────────────

/// Name the interpreter task is registered under.
pub const TASK_NAME: &str = "mp_task";

/// Interpreter task stack (bytes).
pub const TASK_STACK_SIZE: usize = 8 * 1024;

/// Interpreter heap arena (bytes).
pub const TASK_HEAP_SIZE: usize = 88 * 1024;

/// Headroom kept below the stack limit for the runtime's overflow check.
pub const TASK_STACK_MARGIN: usize = 1024;

/// Stack limit handed to the runtime on every (re)start.
pub const TASK_STACK_LIMIT: usize = TASK_STACK_SIZE - TASK_STACK_MARGIN;

/// Core the interpreter task is pinned to.
pub const TASK_CORE: u8 = 0;

/// One level above the minimum system task priority.
pub const TASK_PRIORITY: Priority = Priority::MIN.raised(1);

// ───────────────────────────── Runtime surface ──────────────────────────────

/// Module search path, highest priority first. `""` is needed for frozen modules.
pub const SYS_PATH: [&str; 4] = ["", "/lib", "/bpp/lib", "/sdcard/lib"];

/// Always attempted on (re)start.
pub const BOOT_SCRIPT_INTERNAL: &str = "_boot.py";

/// Attempted unless the runtime is in raw-REPL mode.
pub const BOOT_SCRIPT_USER: &str = "boot.py";

/// Printed on the runtime's stdout before each soft reset.
pub const SOFT_REBOOT_NOTICE: &str = "Badge: soft reboot\r\n";

// ───────────────────────────── Boot decision ────────────────────────────────

/// RTC memory offset of the mode tag.
pub const RTC_MODE_OFFSET: usize = 0;

/// RTC memory offset of the tag's bitwise complement.
pub const RTC_CHECK_OFFSET: usize = 1;

/// Button combination that requests safe mode on a cold boot.
pub const SAFE_MODE_BUTTONS: ButtonMask = ButtonMask::START;

/// Timeout of each companion-app input poll.
pub const COMPANION_POLL_TIMEOUT_MS: u32 = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_limit_leaves_margin() {
        assert_eq!(TASK_STACK_LIMIT, 7 * 1024);
    }

    #[test]
    fn task_priority_is_one_above_minimum() {
        assert_eq!(TASK_PRIORITY.level(), Priority::MIN.level() + 1);
    }
}
