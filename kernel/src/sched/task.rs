// sched/task.rs
//
// Badge task descriptors
// - Priority: RTOS priority with the minimum as the zero point
// - TaskSpec: name, pinned core, priority and the static stack arena
// - TaskEntry: boxed task body handed to the spawner (never expected to return)
// - TaskHandle: what the spawner reports back

use alloc::boxed::Box;
use core::fmt;

use crate::memory::arena::StackArena;

#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Priority(u8);

impl Priority {
    /// Lowest priority the RTOS will schedule.
    pub const MIN: Priority = Priority(0);

    pub const fn new(level: u8) -> Self {
        Priority(level)
    }

    pub const fn raised(self, by: u8) -> Self {
        Priority(self.0.saturating_add(by))
    }

    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Body of a spawned task.
pub type TaskEntry = Box<dyn FnOnce() + Send + 'static>;

#[derive(Clone, Copy, Debug)]
pub struct TaskSpec {
    pub name: &'static str,
    pub core: u8,
    pub priority: Priority,
    pub stack: StackArena,
}

impl TaskSpec {
    /// Stack depth in RTOS words (the unit `xTaskCreateStatic` expects).
    pub fn stack_words(&self) -> usize {
        self.stack.len() / core::mem::size_of::<u32>()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TaskHandle {
    pub id: u32,
    pub name: &'static str,
    pub core: u8,
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@core{}", self.name, self.id, self.core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raised_saturates() {
        assert_eq!(Priority::new(254).raised(5).level(), 255);
        assert_eq!(Priority::MIN.raised(1).level(), 1);
    }

    #[test]
    fn stack_words_are_four_bytes() {
        let bytes: &'static mut [u8] = Box::leak(alloc::vec![0u8; 8 * 1024].into_boxed_slice());
        let spec = TaskSpec {
            name: "mp_task",
            core: 0,
            priority: Priority::MIN.raised(1),
            stack: StackArena::new(bytes),
        };
        assert_eq!(spec.stack_words(), 2048);
    }

    #[test]
    fn handle_display() {
        let h = TaskHandle { id: 7, name: "mp_task", core: 0 };
        assert_eq!(h.to_string(), "mp_task#7@core0");
    }
}
