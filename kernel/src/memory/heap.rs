//! Badge Interpreter Heap Arena
//!
//! The interpreter's garbage-collected heap lives in one fixed region handed
//! over at boot. A soft reset does not free or move the region: `reinit`
//! rebuilds the allocator's free list over the same bytes, so every cycle
//! starts with an empty heap at the same address.

use core::alloc::Layout;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicU32, Ordering};

use linked_list_allocator::Heap;
use spin::Mutex;

use crate::log::log_dbg;

pub struct HeapArena {
    heap: Mutex<Heap>,
    base: usize,
    len: usize,
    generation: AtomicU32,
}

// SAFETY: the allocator state is behind the mutex; `base`/`len` are plain bounds.
unsafe impl Sync for HeapArena {}
unsafe impl Send for HeapArena {}

impl HeapArena {
    /// Take ownership of `bytes` for the lifetime of the device.
    pub fn new(bytes: &'static mut [u8]) -> Self {
        let base = bytes.as_mut_ptr() as usize;
        let len = bytes.len();
        let mut heap = Heap::empty();
        // SAFETY: `bytes` is a unique 'static borrow that now belongs to this arena.
        unsafe { heap.init(base as *mut u8, len) };
        Self {
            heap: Mutex::new(heap),
            base,
            len,
            generation: AtomicU32::new(0),
        }
    }

    /// Drop every allocation and start over on the same bytes.
    ///
    /// Callers must guarantee nothing allocated in the previous generation is
    /// still referenced (the runtime is deinitialized first).
    pub fn reinit(&self) {
        let mut heap = self.heap.lock();
        *heap = Heap::empty();
        // SAFETY: same region as `new`; previous allocations are dead by contract.
        unsafe { heap.init(self.base as *mut u8, self.len) };
        let gen = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        drop(heap);
        log_dbg("heap", "arena reinitialized");
        ::log::trace!(target: "heap", "generation {} at {:#x}+{:#x}", gen, self.base, self.len);
    }

    pub fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        self.heap.lock().allocate_first_fit(layout).ok()
    }

    /// # Safety
    /// `ptr` must come from [`HeapArena::allocate`] with the same `layout`, in
    /// the current generation.
    pub unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.heap.lock().deallocate(ptr, layout)
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn used(&self) -> usize {
        self.heap.lock().used()
    }

    pub fn free(&self) -> usize {
        self.heap.lock().free()
    }

    /// Number of `reinit` calls so far.
    pub fn generation(&self) -> u32 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.base && addr < self.base + self.len
    }
}
