// cli/src/badgectl/mod.rs
// badgectl: host-side simulator for the badge boot core

pub mod board;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod runtime;
pub mod state;
pub mod vfs;
