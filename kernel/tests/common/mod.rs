// Shared mock collaborators for the boot core integration tests.
//
// Non-returning collaborators (restart, OTA) panic with a fixed message so a
// test can run the boot path under `catch_unwind` and see where it ended.

#![allow(dead_code)]

use std::alloc::Layout;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr::NonNull;
use std::sync::{Arc, Mutex};

use badge_kernel::boot::reset::{ButtonMask, ResetCause};
use badge_kernel::boot::rtc::{BootMode, ModeRecord, ModeRegister};
use badge_kernel::error::{RuntimeFault, SpawnError};
use badge_kernel::hal::{
    BadgeServices, ButtonInput, Machine, ResetSource, RtcMemory, System, TaskSpawner,
};
use badge_kernel::memory::{HeapArena, StackArena};
use badge_kernel::modules::{ImportFilter, ImportStat, VfsStat};
use badge_kernel::runtime::{ExecStatus, ReplMode, ReplSignal, Runtime};
use badge_kernel::sched::{TaskEntry, TaskHandle, TaskSpec};

pub const RESTART: &str = "device restart";
pub const OTA: &str = "ota update";

/// Ordered log of collaborator calls, shared between mocks.
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == event).count()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|e| e == event)
    }
}

// ───────────────────────────── Board ───────────────────────────────────────

pub struct MockBoard {
    pub trace: Trace,
    pub rtc: [u8; 8],
    pub cause: ResetCause,
    pub buttons: ButtonMask,
    /// Values returned by successive `poll_event` calls; `1` once exhausted.
    pub events: VecDeque<u32>,
    pub polls: Vec<u32>,
    pub spawned: Vec<(TaskSpec, TaskEntry)>,
    pub spawn_error: Option<SpawnError>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            trace: Trace::default(),
            rtc: [0; 8],
            cause: ResetCause::PowerOn,
            buttons: ButtonMask::empty(),
            events: VecDeque::new(),
            polls: Vec::new(),
            spawned: Vec::new(),
            spawn_error: None,
        }
    }

    pub fn armed(mode: BootMode) -> Self {
        let mut board = Self::new();
        ModeRegister::arm(&mut board, mode);
        board
    }

    pub fn corrupt(tag: u8) -> Self {
        let mut board = Self::new();
        ModeRegister::write(&mut board, ModeRecord::new(tag, tag));
        board
    }

    pub fn with_cause(mut self, cause: ResetCause) -> Self {
        self.cause = cause;
        self
    }

    pub fn with_buttons(mut self, buttons: ButtonMask) -> Self {
        self.buttons = buttons;
        self
    }
}

impl RtcMemory for MockBoard {
    fn rtc_read(&self, offset: usize) -> u8 {
        self.trace.push(format!("rtc_read({offset})"));
        self.rtc[offset]
    }

    fn rtc_write(&mut self, offset: usize, value: u8) {
        self.rtc[offset] = value;
    }
}

impl ResetSource for MockBoard {
    fn reset_cause(&self) -> ResetCause {
        self.trace.push("reset_cause");
        self.cause
    }
}

impl ButtonInput for MockBoard {
    fn button_state(&self) -> ButtonMask {
        self.trace.push("button_state");
        self.buttons
    }

    fn poll_event(&mut self, timeout_ms: u32) -> u32 {
        self.polls.push(timeout_ms);
        self.events.pop_front().unwrap_or(1)
    }
}

impl BadgeServices for MockBoard {
    fn check_first_run(&mut self) {
        self.trace.push("check_first_run");
    }

    fn base_init(&mut self) {
        self.trace.push("base_init");
    }

    fn full_init(&mut self) {
        self.trace.push("full_init");
    }

    fn ota_update(&mut self) -> ! {
        self.trace.push("ota_update");
        panic!("{}", OTA)
    }

    fn first_run(&mut self) {
        self.trace.push("first_run");
    }

    fn companion_init(&mut self) {
        self.trace.push("companion_init");
    }
}

impl System for MockBoard {
    fn restart(&mut self) -> ! {
        self.trace.push("restart");
        panic!("{}", RESTART)
    }
}

impl TaskSpawner for MockBoard {
    fn spawn_pinned(&mut self, spec: TaskSpec, entry: TaskEntry) -> Result<TaskHandle, SpawnError> {
        self.trace.push("spawn");
        if let Some(err) = self.spawn_error {
            return Err(err);
        }
        let handle = TaskHandle { id: self.spawned.len() as u32 + 1, name: spec.name, core: spec.core };
        self.spawned.push((spec, entry));
        Ok(handle)
    }
}

// ───────────────────────────── Interpreter ─────────────────────────────────

/// Scripted interpreter. Each `init` allocates a few objects from the heap
/// and never frees them; only the arena reinit reclaims them.
pub struct MockRuntime {
    pub trace: Trace,
    pub mode: ReplMode,
    pub frozen: Vec<&'static str>,
    /// REPL driver results, in order; `Exit` once exhausted.
    pub repl: VecDeque<Result<ReplSignal, RuntimeFault>>,
    pub init_fault: Option<RuntimeFault>,
    pub sys_path: Vec<&'static str>,
    pub stdout: String,
    pub imports: Option<ImportFilter>,
    pub live_objects: Vec<usize>,
    pub stack_top: usize,
    pub stack_limit: usize,
    pub heap: Option<&'static HeapArena>,
    pub thread_stack: Option<StackArena>,
}

impl MockRuntime {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            mode: ReplMode::Friendly,
            frozen: vec!["_boot.py", "boot.py"],
            repl: VecDeque::new(),
            init_fault: None,
            sys_path: Vec::new(),
            stdout: String::new(),
            imports: None,
            live_objects: Vec::new(),
            stack_top: 0,
            stack_limit: 0,
            heap: None,
            thread_stack: None,
        }
    }
}

impl Runtime for MockRuntime {
    fn set_stack_top(&mut self, top: usize) {
        self.stack_top = top;
    }

    fn set_stack_limit(&mut self, limit: usize) {
        self.stack_limit = limit;
    }

    fn init(&mut self, heap: &'static HeapArena, imports: ImportFilter) -> Result<(), RuntimeFault> {
        self.trace.push("rt.init");
        if let Some(fault) = self.init_fault {
            return Err(fault);
        }
        assert_eq!(heap.used(), 0, "runtime started on a dirty heap");
        let layout = Layout::from_size_align(96, 8).unwrap();
        self.live_objects = (0..4)
            .filter_map(|_| heap.allocate(layout))
            .map(|p: NonNull<u8>| p.as_ptr() as usize)
            .collect();
        self.heap = Some(heap);
        self.imports = Some(imports);
        Ok(())
    }

    fn set_sys_path(&mut self, path: &[&'static str]) {
        self.sys_path = path.to_vec();
    }

    fn clear_argv(&mut self) {
        self.trace.push("rt.clear_argv");
    }

    fn readline_init(&mut self) {
        self.trace.push("rt.readline_init");
    }

    fn exec_mode(&self) -> ReplMode {
        self.mode
    }

    fn exec_frozen(&mut self, name: &str) -> Result<ExecStatus, RuntimeFault> {
        self.trace.push(format!("exec {name}"));
        if self.frozen.contains(&name) {
            Ok(ExecStatus::Ran)
        } else {
            Ok(ExecStatus::Missing)
        }
    }

    fn raw_repl(&mut self) -> Result<ReplSignal, RuntimeFault> {
        self.trace.push("raw_repl");
        self.repl.pop_front().unwrap_or(Ok(ReplSignal::Exit))
    }

    fn friendly_repl(&mut self) -> Result<ReplSignal, RuntimeFault> {
        self.trace.push("friendly_repl");
        self.repl.pop_front().unwrap_or(Ok(ReplSignal::Exit))
    }

    fn stdout_write(&mut self, text: &str) {
        self.trace.push("rt.stdout");
        self.stdout.push_str(text);
    }

    fn deinit(&mut self) {
        self.trace.push("rt.deinit");
        self.imports = None;
    }

    fn flush(&mut self) {
        self.trace.push("rt.flush");
    }

    fn thread_init(&mut self, stack: StackArena) {
        self.trace.push("thread_init");
        self.thread_stack = Some(stack);
    }

    fn thread_deinit(&mut self) {
        self.trace.push("thread_deinit");
    }
}

pub struct MockMachine {
    pub trace: Trace,
}

impl Machine for MockMachine {
    fn uart_init(&mut self) {
        self.trace.push("uart_init");
    }

    fn machine_init(&mut self) {
        self.trace.push("machine_init");
    }

    fn pins_init(&mut self) {
        self.trace.push("pins_init");
    }

    fn pins_deinit(&mut self) {
        self.trace.push("pins_deinit");
    }

    fn restart(&mut self) -> ! {
        self.trace.push("restart");
        panic!("{}", RESTART)
    }
}

// ───────────────────────────── Filesystem ──────────────────────────────────

#[derive(Default)]
pub struct MockFs {
    pub entries: Vec<(&'static str, ImportStat)>,
}

impl MockFs {
    pub fn with(entries: &[(&'static str, ImportStat)]) -> Arc<Self> {
        Arc::new(Self { entries: entries.to_vec() })
    }
}

impl VfsStat for MockFs {
    fn import_stat(&self, path: &str) -> ImportStat {
        self.entries
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, s)| *s)
            .unwrap_or(ImportStat::NoExist)
    }
}

// ───────────────────────────── Helpers ─────────────────────────────────────

pub fn leak(len: usize) -> &'static mut [u8] {
    Box::leak(vec![0u8; len].into_boxed_slice())
}

pub fn arenas() -> (&'static HeapArena, StackArena) {
    let heap: &'static HeapArena = Box::leak(Box::new(HeapArena::new(leak(8 * 1024))));
    (heap, StackArena::new(leak(2 * 1024)))
}

/// Panic message of a non-returning call, if `f` panicked.
pub fn ended_with<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        payload
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
            .unwrap_or_default()
    })
}
