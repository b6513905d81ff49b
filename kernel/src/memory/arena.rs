//! Badge Static Regions
//!
//! `StaticRegion<N>` is an 8-byte aligned byte block placed in `.bss` that can
//! be handed out once. `StackArena` records where the interpreter task stack
//! lives so the spawner and the runtime's thread layer see the same bounds.

use core::cell::UnsafeCell;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicBool, Ordering};

#[repr(C, align(8))]
struct Aligned<const N: usize>([u8; N]);

/// Statically allocated region with take-once ownership.
pub struct StaticRegion<const N: usize> {
    bytes: UnsafeCell<Aligned<N>>,
    taken: AtomicBool,
}

// SAFETY: the bytes are only reachable through the single `&'static mut`
// returned by the first successful `take`.
unsafe impl<const N: usize> Sync for StaticRegion<N> {}

impl<const N: usize> StaticRegion<N> {
    pub const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new(Aligned([0; N])),
            taken: AtomicBool::new(false),
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Exclusive access to the region; `None` after the first call.
    pub fn take(&'static self) -> Option<&'static mut [u8]> {
        if self.taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        // SAFETY: guarded by `taken`, so this is the only live reference.
        let block = unsafe { &mut *self.bytes.get() };
        Some(&mut block.0[..])
    }
}

impl<const N: usize> Default for StaticRegion<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds of the interpreter task stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackArena {
    base: NonNull<u8>,
    len: usize,
}

// SAFETY: a StackArena is a pair of bounds; the memory is owned by the RTOS
// task that runs on it.
unsafe impl Send for StackArena {}
unsafe impl Sync for StackArena {}

impl StackArena {
    pub fn new(bytes: &'static mut [u8]) -> Self {
        let len = bytes.len();
        let base = NonNull::new(bytes.as_mut_ptr()).unwrap_or(NonNull::dangling());
        Self { base, len }
    }

    pub fn base(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    /// Highest address (stacks grow down).
    pub fn top(&self) -> usize {
        self.base.as_ptr() as usize + self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, addr: usize) -> bool {
        let lo = self.base.as_ptr() as usize;
        addr >= lo && addr < lo + self.len
    }
}
