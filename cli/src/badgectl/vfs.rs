// cli/src/badgectl/vfs.rs
// Host directory standing in for the badge filesystem

use std::fs;
use std::path::{Path, PathBuf};

use badge_kernel::modules::{ImportStat, VfsStat};

#[derive(Debug, Clone)]
pub struct HostVfs {
    root: PathBuf,
}

impl HostVfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Device path (`/lib/x`, or relative to `/`) to host path.
    pub fn host_path(&self, device_path: &str) -> PathBuf {
        let rel = device_path.trim_start_matches('/');
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }
}

impl VfsStat for HostVfs {
    fn import_stat(&self, path: &str) -> ImportStat {
        match fs::metadata(self.host_path(path)) {
            Ok(meta) if meta.is_dir() => ImportStat::Dir,
            Ok(meta) if meta.is_file() => ImportStat::File,
            Ok(_) => ImportStat::Other,
            Err(_) => ImportStat::NoExist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_map_onto_the_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/badge")).unwrap();
        fs::write(dir.path().join("lib/widgets"), "").unwrap();
        let vfs = HostVfs::new(dir.path());

        assert_eq!(vfs.import_stat("/lib/badge"), ImportStat::Dir);
        assert_eq!(vfs.import_stat("/lib/widgets"), ImportStat::File);
        assert_eq!(vfs.import_stat("lib/widgets"), ImportStat::File);
        assert_eq!(vfs.import_stat("/lib/missing"), ImportStat::NoExist);
        assert_eq!(vfs.import_stat(""), ImportStat::Dir);
    }
}
