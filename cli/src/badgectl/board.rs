// cli/src/badgectl/board.rs
// Simulated badge board for the boot dispatcher
// - RTC memory backed by the state file
// - reset cause and held buttons from the command line
// - companion-app input polls replayed from the config
// - the pinned task is parked until the dispatcher returns, then run on a host thread

use std::collections::VecDeque;
use std::thread::JoinHandle;

use badge_kernel::boot::reset::{ButtonMask, ResetCause};
use badge_kernel::error::SpawnError;
use badge_kernel::hal::{BadgeServices, ButtonInput, ResetSource, RtcMemory, System, TaskSpawner};
use badge_kernel::sched::{TaskEntry, TaskHandle, TaskSpec};
use colored::Colorize;

use super::error::{CliError, Result};
use super::report;
use super::state::DeviceState;

/// Host threads cannot be pinned; anything but core 0 and 1 is refused like on the chip.
const CORES: u8 = 2;

pub struct SimBoard {
    pub state: DeviceState,
    cause: ResetCause,
    buttons: ButtonMask,
    touch: VecDeque<u32>,
    pending: Option<(TaskSpec, TaskEntry)>,
    spawned: u32,
}

impl SimBoard {
    pub fn new(state: DeviceState, cause: ResetCause, buttons: ButtonMask, touch: Vec<u32>) -> Self {
        Self {
            state,
            cause,
            buttons,
            touch: touch.into(),
            pending: None,
            spawned: 0,
        }
    }

    fn trace(&self, what: &str) {
        report::trace_line(format_args!("{} {}", "[board]".cyan(), what));
    }

    /// Start the parked interpreter task on a host thread.
    pub fn start_task(&mut self) -> Result<Option<JoinHandle<()>>> {
        let Some((spec, entry)) = self.pending.take() else {
            return Ok(None);
        };
        // host threads need more headroom than the badge stack arena
        let stack = spec.stack.len().max(256 * 1024);
        std::thread::Builder::new()
            .name(spec.name.into())
            .stack_size(stack)
            .spawn(entry)
            .map(Some)
            .map_err(|e| CliError::io("<task>", e))
    }

    fn halt(&mut self, why: &str) -> ! {
        if let Err(err) = self.state.save() {
            tracing::error!("state not saved: {err}");
        }
        report::halt(why)
    }
}

impl RtcMemory for SimBoard {
    fn rtc_read(&self, offset: usize) -> u8 {
        self.state.rtc_read(offset)
    }

    fn rtc_write(&mut self, offset: usize, value: u8) {
        self.state.rtc_write(offset, value)
    }
}

impl ResetSource for SimBoard {
    fn reset_cause(&self) -> ResetCause {
        self.cause
    }
}

impl ButtonInput for SimBoard {
    fn button_state(&self) -> ButtonMask {
        self.trace(&format!("buttons sampled: {:?}", self.buttons));
        self.buttons
    }

    fn poll_event(&mut self, timeout_ms: u32) -> u32 {
        let event = self.touch.pop_front().unwrap_or(1);
        tracing::debug!(timeout_ms, event, "input poll");
        event
    }
}

impl BadgeServices for SimBoard {
    fn check_first_run(&mut self) {
        self.trace("first-run check");
    }

    fn base_init(&mut self) {
        self.trace("base init");
    }

    fn full_init(&mut self) {
        self.trace("full init (display, touch controller)");
    }

    fn ota_update(&mut self) -> ! {
        self.trace("OTA update");
        self.halt("ota")
    }

    fn first_run(&mut self) {
        self.trace("first-run provisioning");
    }

    fn companion_init(&mut self) {
        self.trace("companion app running");
    }
}

impl System for SimBoard {
    fn restart(&mut self) -> ! {
        self.halt("restart")
    }
}

impl TaskSpawner for SimBoard {
    fn spawn_pinned(&mut self, spec: TaskSpec, entry: TaskEntry) -> std::result::Result<TaskHandle, SpawnError> {
        if spec.core >= CORES {
            return Err(SpawnError::InvalidCore(spec.core));
        }
        if spec.stack.is_empty() {
            return Err(SpawnError::StackTooSmall(spec.stack.len()));
        }
        if self.pending.is_some() {
            return Err(SpawnError::NoControlBlock(spec.name));
        }
        self.spawned += 1;
        self.trace(&format!(
            "task '{}' pinned to core {} (prio {}, {} stack words)",
            spec.name,
            spec.core,
            spec.priority.level(),
            spec.stack_words()
        ));
        self.pending = Some((spec, entry));
        Ok(TaskHandle { id: self.spawned, name: spec.name, core: spec.core })
    }
}

/// `power-on | hard | software | watchdog | deep-sleep | brownout | rom=N`
pub fn parse_cause(s: &str) -> Result<ResetCause> {
    let cause = match s.to_ascii_lowercase().as_str() {
        "power-on" => ResetCause::PowerOn,
        "hard" => ResetCause::Hard,
        "software" => ResetCause::Software,
        "watchdog" => ResetCause::Watchdog,
        "deep-sleep" => ResetCause::DeepSleep,
        "brownout" => ResetCause::Brownout,
        other => other
            .strip_prefix("rom=")
            .and_then(|n| n.parse::<u32>().ok())
            .map(ResetCause::from_rom_code)
            .ok_or_else(|| CliError::ResetCause(s.into()))?,
    };
    Ok(cause)
}

/// Comma separated button names, e.g. `start` or `a,b`.
pub fn parse_buttons(s: &str) -> Result<ButtonMask> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .try_fold(ButtonMask::empty(), |mask, name| {
            ButtonMask::from_name(&name.to_ascii_uppercase())
                .map(|b| mask | b)
                .ok_or_else(|| CliError::Button(name.into()))
        })
}
