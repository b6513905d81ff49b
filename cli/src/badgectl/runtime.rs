// cli/src/badgectl/runtime.rs
// Scripted interpreter and machine layer for the simulated interpreter task
// - startup scripts are read from the mounted filesystem; `import x` lines are
//   resolved through the import filter so safe mode is visible
// - each REPL session ends at once (a simulated ctrl-D) to drive soft resets
// - after the requested number of soft resets the badge powers off

use std::alloc::Layout;
use std::fs;
use std::path::PathBuf;

use badge_kernel::error::RuntimeFault;
use badge_kernel::hal::Machine;
use badge_kernel::memory::{HeapArena, StackArena};
use badge_kernel::modules::{ImportFilter, ImportStat};
use badge_kernel::runtime::{ExecStatus, ReplMode, ReplSignal, Runtime};
use colored::Colorize;

use super::report;

/// Interpreter objects allocated by every cold init (module dict, sys.path, ...).
const BOOT_OBJECTS: usize = 6;
const OBJECT_LAYOUT: (usize, usize) = (256, 8);

pub struct SimRuntime {
    fs_root: PathBuf,
    mode: ReplMode,
    soft_resets: u32,
    sessions: u32,
    heap: Option<&'static HeapArena>,
    imports: Option<ImportFilter>,
    sys_path: Vec<&'static str>,
}

impl SimRuntime {
    pub fn new(fs_root: PathBuf, mode: ReplMode, soft_resets: u32) -> Self {
        Self {
            fs_root,
            mode,
            soft_resets,
            sessions: 0,
            heap: None,
            imports: None,
            sys_path: Vec::new(),
        }
    }

    fn trace(&self, what: &str) {
        report::trace_line(format_args!("{} {}", "[rt]".magenta(), what));
    }

    fn import(&self, module: &str) {
        let Some(imports) = &self.imports else {
            return;
        };
        let found = self
            .sys_path
            .iter()
            .map(|dir| format!("{}/{}", dir, module))
            .map(|path| (imports.import_stat(&path), path))
            .find(|(stat, _)| *stat != ImportStat::NoExist);
        match found {
            Some((stat, path)) => self.trace(&format!("import {} -> {} ({})", module, path, stat)),
            None => self.trace(&format!("import {} -> {}", module, "ImportError".red())),
        }
    }

    fn session(&mut self, kind: &str) -> Result<ReplSignal, RuntimeFault> {
        if self.sessions >= self.soft_resets {
            self.trace(&format!("{} REPL idle, powering off", kind));
            report::halt("power-off")
        }
        self.sessions += 1;
        self.trace(&format!("{} REPL: ctrl-D", kind));
        Ok(ReplSignal::Exit)
    }
}

impl Runtime for SimRuntime {
    fn set_stack_top(&mut self, top: usize) {
        tracing::trace!(top, "stack top");
    }

    fn set_stack_limit(&mut self, limit: usize) {
        tracing::trace!(limit, "stack limit");
    }

    fn init(&mut self, heap: &'static HeapArena, imports: ImportFilter) -> Result<(), RuntimeFault> {
        let layout = Layout::from_size_align(OBJECT_LAYOUT.0, OBJECT_LAYOUT.1)
            .map_err(|_| RuntimeFault::new(0, "bad object layout"))?;
        for _ in 0..BOOT_OBJECTS {
            heap.allocate(layout).ok_or(RuntimeFault::new(heap.used(), "heap exhausted during init"))?;
        }
        self.trace(&format!(
            "init: heap gen {} at {:#x}, {} used / {} free, safe mode {}",
            heap.generation(),
            heap.base(),
            heap.used(),
            heap.free(),
            imports.context().safe_mode()
        ));
        self.heap = Some(heap);
        self.imports = Some(imports);
        Ok(())
    }

    fn set_sys_path(&mut self, path: &[&'static str]) {
        self.sys_path = path.to_vec();
        self.trace(&format!("sys.path = {:?}", self.sys_path));
    }

    fn clear_argv(&mut self) {}

    fn readline_init(&mut self) {}

    fn exec_mode(&self) -> ReplMode {
        self.mode
    }

    fn exec_frozen(&mut self, name: &str) -> Result<ExecStatus, RuntimeFault> {
        let Ok(source) = fs::read_to_string(self.fs_root.join(name)) else {
            return Ok(ExecStatus::Missing);
        };
        self.trace(&format!("exec {}", name));
        for module in source.lines().filter_map(|l| l.trim().strip_prefix("import ")) {
            self.import(module.trim());
        }
        Ok(ExecStatus::Ran)
    }

    fn raw_repl(&mut self) -> Result<ReplSignal, RuntimeFault> {
        self.session("raw")
    }

    fn friendly_repl(&mut self) -> Result<ReplSignal, RuntimeFault> {
        self.session("friendly")
    }

    fn stdout_write(&mut self, text: &str) {
        report::emit(&text.replace("\r\n", "\n"));
    }

    fn deinit(&mut self) {
        self.imports = None;
        if let Some(heap) = self.heap {
            tracing::debug!(used = heap.used(), "runtime deinit, arena kept");
        }
    }

    fn flush(&mut self) {
        report::flush();
    }

    fn thread_init(&mut self, stack: StackArena) {
        self.trace(&format!("thread layer: main stack {:#x}+{:#x}", stack.base() as usize, stack.len()));
    }

    fn thread_deinit(&mut self) {
        tracing::debug!("thread layer deinit");
    }
}

pub struct SimMachine;

impl Machine for SimMachine {
    fn uart_init(&mut self) {
        tracing::debug!("uart up");
    }

    fn machine_init(&mut self) {
        tracing::debug!("machine layer up");
    }

    fn pins_init(&mut self) {
        tracing::debug!("pins up");
    }

    fn pins_deinit(&mut self) {
        tracing::debug!("pins released");
    }

    fn restart(&mut self) -> ! {
        report::halt("restart")
    }
}
