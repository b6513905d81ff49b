// modules/vfs.rs
//
// Filesystem status lookup used for module resolution
// - ImportStat: the four answers the interpreter understands
// - VfsStat: implemented by the board's mounted filesystems

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStat {
    NoExist,
    Dir,
    File,
    /// Exists but is neither a plain file nor a directory.
    Other,
}

impl fmt::Display for ImportStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportStat::NoExist => "no-exist",
            ImportStat::Dir => "dir",
            ImportStat::File => "file",
            ImportStat::Other => "other",
        })
    }
}

pub trait VfsStat: Send + Sync {
    fn import_stat(&self, path: &str) -> ImportStat;
}
