// cli/src/main.rs
// badgectl: arm the RTC mode register, power-cycle a simulated badge through
// the boot dispatcher, and inspect the safe-mode import sandbox on a host directory.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use badge_kernel::boot::reset::ResetCause;
use badge_kernel::boot::{BootContext, BootDispatcher, BootFeatures};
use badge_kernel::config::{TASK_HEAP_SIZE, TASK_STACK_SIZE};
use badge_kernel::memory::{HeapArena, StackArena, StaticRegion};
use badge_kernel::modules::{ImportFilter, SandboxPolicy};
use badge_kernel::runtime::{InterpreterTask, ReplMode};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

mod badgectl;
use badgectl::board::{parse_buttons, parse_cause, SimBoard};
use badgectl::config::SimConfig;
use badgectl::error::{CliError, Result};
use badgectl::runtime::{SimMachine, SimRuntime};
use badgectl::state::{parse_mode, DeviceState};
use badgectl::vfs::HostVfs;
use badgectl::{logging, report};

const DEFAULT_CONFIG: &str = "badgectl.toml";

static TASK_STACK: StaticRegion<TASK_STACK_SIZE> = StaticRegion::new();
static TASK_HEAP: StaticRegion<TASK_HEAP_SIZE> = StaticRegion::new();

#[derive(Parser)]
#[command(
    name = "badgectl",
    version,
    about = "badgectl: badge boot core simulator",
    long_about = "badgectl drives the badge boot core against a simulated board: the RTC mode register lives in a state file, the badge filesystem is a host directory."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Device state file (RTC memory, boot counter)
    #[arg(long, global = true, env = "BADGECTL_STATE", default_value = "badge-state.json")]
    state: PathBuf,

    /// Simulator config (TOML); ./badgectl.toml is used when present
    #[arg(long, global = true, env = "BADGECTL_CONFIG")]
    config: Option<PathBuf>,

    /// Host directory mounted as the badge filesystem (overrides the config)
    #[arg(long, global = true, env = "BADGECTL_FS_ROOT")]
    fs_root: Option<PathBuf>,

    /// Enable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// badgectl diagnostics on stderr (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a mode into the RTC register for the next boot
    Arm {
        /// none, ota, companion, first-run or raw=N
        mode: String,
        /// Store a complement that does not match
        #[arg(long)]
        corrupt: bool,
    },
    /// Show the RTC mode register
    Rtc,
    /// Power-cycle the badge
    Boot(BootArgs),
    /// Resolve module paths through the import filter
    ImportStat {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long)]
        safe_mode: bool,
    },
}

#[derive(Args)]
struct BootArgs {
    /// power-on, hard, software, watchdog, deep-sleep, brownout or rom=N
    #[arg(long, default_value = "power-on")]
    reset_cause: String,
    /// Buttons held during boot, comma separated (e.g. start)
    #[arg(long, default_value = "")]
    buttons: String,
    /// Soft resets before the simulated badge powers off
    #[arg(long, default_value_t = 1)]
    cycles: u32,
    #[arg(long)]
    raw_repl: bool,
    /// Boot as if built without the companion app
    #[arg(long)]
    no_companion: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.clone().or_else(|| {
        let local = PathBuf::from(DEFAULT_CONFIG);
        local.is_file().then_some(local)
    });
    let mut cfg = SimConfig::load(config.as_deref())?;
    report::json_mode(cli.json);
    if let Some(root) = cli.fs_root.clone() {
        cfg.fs_root = root;
    }

    match cli.command {
        Commands::Arm { mode, corrupt } => {
            let mode = parse_mode(&mode)?;
            let mut state = DeviceState::load(&cli.state)?;
            state.arm(mode, corrupt);
            state.save()?;
            report::trace_line(format_args!(
                "[arm] mode {} armed{}",
                mode,
                if corrupt { " (corrupt complement)" } else { "" }
            ));
            report::print_rtc(state.record(), cli.json);
            Ok(())
        }
        Commands::Rtc => {
            let state = DeviceState::load(&cli.state)?;
            report::print_rtc(state.record(), cli.json);
            Ok(())
        }
        Commands::Boot(args) => boot(&cli.state, &cfg, args, cli.json, cli.verbose),
        Commands::ImportStat { paths, safe_mode } => {
            let ctx = Arc::new(BootContext::new(ResetCause::PowerOn, safe_mode));
            let filter = ImportFilter::new(ctx, Arc::new(HostVfs::new(&cfg.fs_root)));
            for path in &paths {
                let rule = safe_mode.then(|| SandboxPolicy::BADGE.evaluate(path));
                report::print_import_stat(path, filter.import_stat(path), rule, cli.json);
            }
            Ok(())
        }
    }
}

fn boot(state_path: &Path, cfg: &SimConfig, args: BootArgs, json: bool, verbose: u8) -> Result<()> {
    let cause = parse_cause(&args.reset_cause)?;
    let buttons = parse_buttons(&args.buttons)?;
    logging::init(cfg.level_filter(), verbose)?;

    let mut state = DeviceState::load(state_path)?;
    state.boots += 1;
    state.save()?;
    report::trace_line(format_args!("[sim] power cycle #{} ({})", state.boots, cause));

    let stack = StackArena::new(TASK_STACK.take().ok_or(CliError::ArenaTaken("stack"))?);
    let heap: &'static HeapArena =
        Box::leak(Box::new(HeapArena::new(TASK_HEAP.take().ok_or(CliError::ArenaTaken("heap"))?)));

    let mode = if args.raw_repl || cfg.raw_repl() { ReplMode::Raw } else { ReplMode::Friendly };
    let task = InterpreterTask {
        runtime: SimRuntime::new(cfg.fs_root.clone(), mode, args.cycles),
        machine: SimMachine,
        vfs: Arc::new(HostVfs::new(&cfg.fs_root)),
        heap,
        stack,
    };

    let features = BootFeatures {
        companion_app: BootFeatures::compiled().companion_app && !args.no_companion,
    };
    let mut board = SimBoard::new(state, cause, buttons, cfg.touch_events.clone());
    let outcome = BootDispatcher::with_features(&mut board, task, features).run();
    report::print_outcome(outcome, json);
    board.state.save()?;

    match board.start_task()? {
        // the task only ends through a device restart or power-off, both of which exit
        Some(handle) => {
            let _ = handle.join();
            Err(CliError::TaskEnded)
        }
        None => Ok(()),
    }
}
