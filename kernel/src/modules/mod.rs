//! Badge Module Resolution
//!
//! - [`vfs`]: filesystem-status seam the interpreter resolves imports through
//! - [`sandbox`]: safe-mode import policy layered on top of it

pub mod sandbox;
pub mod vfs;

pub use sandbox::{ImportFilter, SandboxPolicy, Verdict};
pub use vfs::{ImportStat, VfsStat};
