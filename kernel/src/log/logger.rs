// log/logger.rs
//
// Badge console logger
// - `log` facade backend writing one line per record to the device console (UART)
// - line format: `LEVEL [target] message\r\n`
// - panic mode: every record passes, sink flushed after each line (fatal path)
// - tag helpers (`log_info("boot", ..)`) for call sites that build the message themselves

use alloc::boxed::Box;
use core::fmt::{self, Write};
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ::log::{Level, LevelFilter, Log, Metadata, Record};
use spin::{Mutex, Once};

use crate::error::BootError;

/// Byte sink the logger writes to (UART on the badge, stdout in the simulator).
pub trait Console: Send {
    fn write_str(&mut self, s: &str);

    fn flush(&mut self) {}
}

struct ConsoleWriter<'a>(&'a mut dyn Console);

impl Write for ConsoleWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

pub struct Logger {
    sink: Mutex<Option<Box<dyn Console>>>,
    level: AtomicUsize,
    panic_mode: AtomicBool,
}

impl Logger {
    pub const fn new() -> Self {
        Self {
            sink: Mutex::new(None),
            level: AtomicUsize::new(LevelFilter::Info as usize),
            panic_mode: AtomicBool::new(false),
        }
    }

    /// Attach (or replace) the console sink.
    pub fn attach(&self, console: Box<dyn Console>, level: LevelFilter) {
        *self.sink.lock() = Some(console);
        self.level.store(level as usize, Ordering::Relaxed);
    }

    pub fn level(&self) -> LevelFilter {
        match self.level.load(Ordering::Relaxed) {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn in_panic_mode(&self) -> bool {
        self.panic_mode.load(Ordering::Acquire)
    }

    /// Write a raw line with a tag, bypassing the facade.
    pub fn log_line(&self, level: Level, tag: &str, args: fmt::Arguments<'_>) {
        if !self.in_panic_mode() && level > self.level() {
            return;
        }
        let mut guard = self.sink.lock();
        if let Some(sink) = guard.as_mut() {
            let mut w = ConsoleWriter(sink.as_mut());
            let _ = write!(w, "{:<5} [{}] {}\r\n", level, tag, args);
            if self.in_panic_mode() {
                sink.flush();
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.in_panic_mode() || metadata.level() <= self.level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.log_line(record.level(), record.target(), *record.args());
        }
    }

    fn flush(&self) {
        if let Some(sink) = self.sink.lock().as_mut() {
            sink.flush();
        }
    }
}

// ───────────────────────────── Global instance ─────────────────────────────

static LOGGER: Logger = Logger::new();
static INSTALLED: Once<()> = Once::new();

/// Install the console logger as the `log` backend. Only the first call wins.
pub fn init(console: Box<dyn Console>, level: LevelFilter) -> Result<(), BootError> {
    if INSTALLED.is_completed() {
        return Err(BootError::LoggerInstalled);
    }
    LOGGER.attach(console, level);
    ::log::set_logger(&LOGGER).map_err(|_| BootError::LoggerInstalled)?;
    ::log::set_max_level(level);
    INSTALLED.call_once(|| ());
    Ok(())
}

pub fn try_get_logger() -> Option<&'static Logger> {
    INSTALLED.get().map(|_| &LOGGER)
}

/// Let every record through and flush after each line. Never reverted.
pub fn enter_panic_mode() {
    LOGGER.panic_mode.store(true, Ordering::Release);
    ::log::set_max_level(LevelFilter::Trace);
}

pub fn log_info(tag: &str, msg: &str) {
    ::log::info!(target: tag, "{}", msg);
}

pub fn log_warn(tag: &str, msg: &str) {
    ::log::warn!(target: tag, "{}", msg);
}

pub fn log_err(tag: &str, msg: &str) {
    ::log::error!(target: tag, "{}", msg);
}

pub fn log_dbg(tag: &str, msg: &str) {
    ::log::debug!(target: tag, "{}", msg);
}

pub fn log_fatal(tag: &str, msg: &str) {
    enter_panic_mode();
    ::log::error!(target: tag, "FATAL: {}", msg);
}
