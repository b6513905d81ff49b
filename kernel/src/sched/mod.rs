// sched/mod.rs
//
// Badge task model
// - the boot core creates exactly one long-lived task: the interpreter
// - pinned to one core, static stack, priority one above the RTOS minimum
// - creation goes through `hal::TaskSpawner`; the RTOS owns scheduling

pub mod task;

pub use task::{Priority, TaskEntry, TaskHandle, TaskSpec};
