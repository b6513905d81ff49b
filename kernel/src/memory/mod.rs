//! Badge Memory Arenas
//!
//! The interpreter task owns two fixed regions for the life of the device:
//! its stack and its heap. Both come from statics taken exactly once and are
//! reinitialized, never reallocated, on every soft reset.

pub mod arena;
pub mod heap;

pub use arena::{StackArena, StaticRegion};
pub use heap::HeapArena;
