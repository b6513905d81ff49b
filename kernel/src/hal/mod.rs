//! Badge Hardware & Service Abstraction
//!
//! Entry points the boot core consumes from the rest of the firmware. Each
//! trait is a seam the board glue fills in; the boot core never touches
//! registers itself.
//!
//! - [`RtcMemory`]: battery-backed bytes that survive reset and deep sleep
//! - [`ResetSource`]: ROM reset reason of the boot CPU
//! - [`ButtonInput`]: live button sample and the touch/input event poll
//! - [`BadgeServices`]: one-shot collaborators (first run, OTA, companion app, board init)
//! - [`System`]: device restart
//! - [`TaskSpawner`]: pinned task creation on the RTOS
//! - [`Machine`]: peripheral bring-up owned by the interpreter task

use crate::boot::reset::{ButtonMask, ResetCause};
use crate::error::SpawnError;
use crate::sched::task::{TaskEntry, TaskHandle, TaskSpec};

pub trait RtcMemory {
    fn rtc_read(&self, offset: usize) -> u8;

    fn rtc_write(&mut self, offset: usize, value: u8);
}

pub trait ResetSource {
    fn reset_cause(&self) -> ResetCause;
}

pub trait ButtonInput {
    /// Buttons held right now. Only meaningful after [`BadgeServices::full_init`].
    fn button_state(&self) -> ButtonMask;

    /// Block up to `timeout_ms` for an input event; `0` means none arrived.
    fn poll_event(&mut self, timeout_ms: u32) -> u32;
}

pub trait BadgeServices {
    /// Detect an unprovisioned badge (runs every boot).
    fn check_first_run(&mut self);

    /// Baseline board bring-up (runs every boot).
    fn base_init(&mut self);

    /// Full board bring-up, including the button/touch controller.
    fn full_init(&mut self);

    /// Firmware update. Ends in a restart.
    fn ota_update(&mut self) -> !;

    fn first_run(&mut self);

    /// Start the companion app in the background.
    fn companion_init(&mut self);
}

pub trait System {
    fn restart(&mut self) -> !;
}

pub trait TaskSpawner {
    fn spawn_pinned(&mut self, spec: TaskSpec, entry: TaskEntry) -> Result<TaskHandle, SpawnError>;
}

/// Everything the boot dispatcher needs from the board.
pub trait Board: RtcMemory + ResetSource + ButtonInput + BadgeServices + System + TaskSpawner {}

impl<T> Board for T where T: RtcMemory + ResetSource + ButtonInput + BadgeServices + System + TaskSpawner {}

/// Peripherals owned by the interpreter task.
pub trait Machine: Send {
    /// Console UART (once per task lifetime).
    fn uart_init(&mut self);

    /// Machine module state (once per task lifetime).
    fn machine_init(&mut self);

    /// Pin bring-up, repeated on every soft reset.
    fn pins_init(&mut self);

    fn pins_deinit(&mut self);

    fn restart(&mut self) -> !;
}
