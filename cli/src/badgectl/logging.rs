// cli/src/badgectl/logging.rs
// Two log streams, kept apart
// - badge console: the kernel `log` backend, written to stdout like the UART
//   (stderr under `--json`)
// - badgectl diagnostics: `tracing` to stderr, filtered by BADGECTL_LOG

use badge_kernel::log::{init_logger, Console};
use log::LevelFilter;
use tracing_subscriber::EnvFilter;

use super::error::Result;
use super::report;

/// Badge UART stand-in.
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_str(&mut self, s: &str) {
        report::emit(&s.replace("\r\n", "\n"));
    }

    fn flush(&mut self) {
        report::flush();
    }
}

pub fn init(console_level: LevelFilter, verbose: u8) -> Result<()> {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("BADGECTL_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    init_logger(Box::new(StdoutConsole), console_level)?;
    Ok(())
}
