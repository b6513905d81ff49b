// cli/src/badgectl/report.rs
// Human and JSON renderings of badge state and boot outcomes

use std::fmt::Display;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use badge_kernel::boot::rtc::ModeRecord;
use badge_kernel::modules::{ImportStat, Verdict};
use badge_kernel::BootOutcome;
use colored::Colorize;
use serde::Serialize;

static TRACE_ON_STDERR: AtomicBool = AtomicBool::new(false);

/// Under `--json` stdout carries only JSON; simulator traces and the device console move to stderr.
pub fn json_mode(on: bool) {
    TRACE_ON_STDERR.store(on, Ordering::Relaxed);
}

/// Raw trace text (console output, REPL stdout).
pub fn emit(text: &str) {
    if TRACE_ON_STDERR.load(Ordering::Relaxed) {
        let _ = std::io::stderr().lock().write_all(text.as_bytes());
    } else {
        let _ = std::io::stdout().lock().write_all(text.as_bytes());
    }
}

pub fn trace_line(line: impl Display) {
    emit(&format!("{}\n", line));
}

pub fn flush() {
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}

#[derive(Debug, Serialize)]
pub struct RtcView {
    pub tag: u8,
    pub check: u8,
    pub valid: bool,
    pub mode: Option<String>,
}

impl From<ModeRecord> for RtcView {
    fn from(rec: ModeRecord) -> Self {
        Self {
            tag: rec.tag,
            check: rec.check,
            valid: rec.is_valid(),
            mode: rec.mode().map(|m| m.to_string()),
        }
    }
}

pub fn print_rtc(rec: ModeRecord, json: bool) {
    let view = RtcView::from(rec);
    if json {
        println!("{}", serde_json::to_string_pretty(&view).unwrap_or_default());
        return;
    }
    println!("[rtc] byte0 (mode):  {:#04x}", view.tag);
    println!("[rtc] byte1 (check): {:#04x}", view.check);
    match view.mode {
        Some(mode) => println!("[rtc] register {} -> {}", "valid".green(), mode),
        None => println!("[rtc] register {} (cold boot path)", "invalid".yellow()),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum OutcomeView {
    Interpreter { task: String, safe_mode: bool, reset_cause: String },
    FirstRun,
}

impl From<BootOutcome> for OutcomeView {
    fn from(outcome: BootOutcome) -> Self {
        match outcome {
            BootOutcome::Interpreter { handle, safe_mode, cause } => OutcomeView::Interpreter {
                task: handle.to_string(),
                safe_mode,
                reset_cause: cause.to_string(),
            },
            BootOutcome::FirstRun => OutcomeView::FirstRun,
        }
    }
}

pub fn print_outcome(outcome: BootOutcome, json: bool) {
    let view = OutcomeView::from(outcome);
    if json {
        println!("{}", serde_json::to_string(&view).unwrap_or_default());
        return;
    }
    match view {
        OutcomeView::Interpreter { task, safe_mode, reset_cause } => {
            let mode = if safe_mode { "ON".red().bold() } else { "off".normal() };
            println!("[boot] interpreter task {} started (reset cause {}, safe mode {})", task, reset_cause, mode);
        }
        OutcomeView::FirstRun => println!("[boot] first-run provisioning finished"),
    }
}

/// `rule` is the sandbox rule that applied, when safe mode is on.
pub fn print_import_stat(path: &str, stat: ImportStat, rule: Option<Verdict>, json: bool) {
    if json {
        let rule = rule.map(|r| r.to_string());
        println!("{}", serde_json::json!({ "path": path, "stat": stat.to_string(), "rule": rule }));
        return;
    }
    let shown = match stat {
        ImportStat::NoExist => stat.to_string().dimmed(),
        _ => stat.to_string().green(),
    };
    match rule {
        Some(rule) => println!("[import] {:<28} {} ({})", path, shown, rule),
        None => println!("[import] {:<28} {}", path, shown),
    }
}

/// End of the simulated power cycle.
pub fn halt(why: &str) -> ! {
    trace_line(format_args!("[sim] device {}", why));
    flush();
    std::process::exit(0)
}
