//! Badge Interpreter Task Supervisor
//!
//! Body of the single long-lived interpreter task. It is an explicit state
//! machine: `Init` once per task lifetime, then `Start → Run → Teardown`
//! forever. Every `Start` is a cold start of the interpreter over the same
//! heap and stack arenas; nothing from the previous cycle survives except the
//! boot context.
//!
//! The task only leaves the loop through a device restart, either from the
//! runtime itself or from [`crate::runtime::fault::fatal`].

use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;

use crate::boot::context::BootContext;
use crate::boot::dispatch::Launch;
use crate::config::{
    BOOT_SCRIPT_INTERNAL, BOOT_SCRIPT_USER, SOFT_REBOOT_NOTICE, SYS_PATH, TASK_CORE, TASK_NAME,
    TASK_PRIORITY, TASK_STACK_LIMIT,
};
use crate::error::RuntimeFault;
use crate::hal::Machine;
use crate::log::{log_dbg, log_info};
use crate::memory::arena::StackArena;
use crate::memory::heap::HeapArena;
use crate::modules::sandbox::ImportFilter;
use crate::modules::vfs::VfsStat;
use crate::runtime::{fault, ExecStatus, ReplMode, ReplSignal, Runtime};
use crate::sched::task::{TaskEntry, TaskSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Start,
    Run,
    Teardown,
}

pub struct Supervisor<R: Runtime, M: Machine> {
    ctx: Arc<BootContext>,
    runtime: R,
    machine: M,
    vfs: Arc<dyn VfsStat>,
    heap: &'static HeapArena,
    stack: StackArena,
    phase: Phase,
    cycles: u32,
    stack_top: usize,
    thread_active: bool,
}

impl<R: Runtime, M: Machine> Supervisor<R, M> {
    pub fn new(ctx: Arc<BootContext>, task: InterpreterTask<R, M>) -> Self {
        Self {
            ctx,
            runtime: task.runtime,
            machine: task.machine,
            vfs: task.vfs,
            heap: task.heap,
            stack: task.stack,
            phase: Phase::Init,
            cycles: 0,
            stack_top: 0,
            thread_active: false,
        }
    }

    /// Once per task lifetime. `sp` is the stack pointer of the task's own frame.
    pub fn init(&mut self, sp: usize) {
        self.phase = Phase::Init;
        self.stack_top = sp;
        if cfg!(feature = "thread") {
            self.runtime.thread_init(self.stack);
            self.thread_active = true;
        }
        self.machine.uart_init();
        self.machine.machine_init();
        log_dbg("supervisor", &format!("stack top {:#x}, arena {:#x}+{:#x}", sp, self.stack.base() as usize, self.stack.len()));
    }

    /// Cold (re)start of the interpreter and the startup scripts.
    pub fn start(&mut self) -> Result<(), RuntimeFault> {
        self.phase = Phase::Start;
        self.runtime.set_stack_top(self.stack_top);
        self.runtime.set_stack_limit(TASK_STACK_LIMIT);

        self.heap.reinit();
        let imports = ImportFilter::new(self.ctx.clone(), self.vfs.clone());
        self.runtime.init(self.heap, imports)?;

        self.runtime.set_sys_path(&SYS_PATH);
        self.runtime.clear_argv();
        self.runtime.readline_init();
        self.machine.pins_init();

        self.exec_boot_script(BOOT_SCRIPT_INTERNAL)?;
        if self.runtime.exec_mode() != ReplMode::Raw {
            self.exec_boot_script(BOOT_SCRIPT_USER)?;
        }
        Ok(())
    }

    /// REPL loop until a driver asks for a soft reset.
    pub fn run(&mut self) -> Result<(), RuntimeFault> {
        self.phase = Phase::Run;
        loop {
            let signal = match self.runtime.exec_mode() {
                ReplMode::Raw => self.runtime.raw_repl()?,
                ReplMode::Friendly => self.runtime.friendly_repl()?,
            };
            if signal == ReplSignal::Exit {
                return Ok(());
            }
        }
    }

    pub fn teardown(&mut self) {
        self.phase = Phase::Teardown;
        if self.thread_active {
            self.runtime.thread_deinit();
        }
        self.runtime.stdout_write(SOFT_REBOOT_NOTICE);
        self.machine.pins_deinit();
        self.runtime.deinit();
        self.runtime.flush();
        self.ctx.record_soft_reset();
        self.cycles = self.cycles.wrapping_add(1);
        log_info("supervisor", &format!("soft reset #{}", self.cycles));
    }

    /// One Start → Run → Teardown pass.
    pub fn cycle(&mut self) -> Result<(), RuntimeFault> {
        self.start()?;
        self.run()?;
        self.teardown();
        Ok(())
    }

    pub fn run_forever(mut self) -> ! {
        self.init(current_sp());
        loop {
            if let Err(err) = self.cycle() {
                fault::fatal(&mut self.machine, err);
            }
        }
    }

    fn exec_boot_script(&mut self, name: &str) -> Result<(), RuntimeFault> {
        if self.runtime.exec_frozen(name)? == ExecStatus::Missing {
            log_dbg("supervisor", &format!("{} not found, skipped", name));
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed soft resets.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn context(&self) -> &Arc<BootContext> {
        &self.ctx
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn heap(&self) -> &'static HeapArena {
        self.heap
    }

    pub fn stack(&self) -> StackArena {
        self.stack
    }
}

// ───────────────────────────── Launch ──────────────────────────────────────

/// Everything the interpreter task owns, before it is spawned.
pub struct InterpreterTask<R: Runtime, M: Machine> {
    pub runtime: R,
    pub machine: M,
    pub vfs: Arc<dyn VfsStat>,
    pub heap: &'static HeapArena,
    pub stack: StackArena,
}

impl<R, M> Launch for InterpreterTask<R, M>
where
    R: Runtime + 'static,
    M: Machine + 'static,
{
    fn spec(&self) -> TaskSpec {
        TaskSpec {
            name: TASK_NAME,
            core: TASK_CORE,
            priority: TASK_PRIORITY,
            stack: self.stack,
        }
    }

    fn into_entry(self, ctx: Arc<BootContext>) -> TaskEntry {
        Box::new(move || {
            Supervisor::new(ctx, self).run_forever();
        })
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "riscv32")] {
        #[inline(always)]
        fn current_sp() -> usize {
            let sp: usize;
            // SAFETY: reads the stack pointer register only.
            unsafe { core::arch::asm!("mv {}, sp", out(reg) sp) };
            sp
        }
    } else {
        #[inline(never)]
        fn current_sp() -> usize {
            let marker = 0u8;
            core::hint::black_box(&marker) as *const u8 as usize
        }
    }
}
