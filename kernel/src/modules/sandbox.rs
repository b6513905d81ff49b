//! Badge Safe-Mode Import Sandbox
//!
//! Every module path the interpreter resolves goes through [`ImportFilter`].
//! With safe mode off it is a plain filesystem lookup. With safe mode on:
//! - only the library roots are visible
//! - a fixed denylist of system modules is hidden
//! - top-level entries under `/lib/` must be packages (directories)
//! - anything nested deeper resolves normally

use alloc::sync::Arc;
use core::fmt;

use crate::boot::context::BootContext;
use crate::modules::vfs::{ImportStat, VfsStat};

/// Static description of what safe mode exposes.
#[derive(Debug, Clone, Copy)]
pub struct SandboxPolicy {
    pub roots: &'static [&'static str],
    pub denylist: &'static [&'static str],
    /// Root whose direct children must be directories.
    pub package_root: &'static str,
}

impl SandboxPolicy {
    pub const BADGE: SandboxPolicy = SandboxPolicy {
        roots: &["/lib/", "/bpp/lib/", "/sdcard/lib/"],
        denylist: &["/lib/json", "/lib/os", "/lib/socket", "/lib/struct", "/lib/time"],
        package_root: "/lib/",
    };

    /// Path-only screening; the filesystem is not consulted.
    pub fn evaluate(&self, path: &str) -> Verdict {
        if !self.roots.iter().any(|root| path.starts_with(root)) {
            return Verdict::OutsideRoots;
        }
        if self.denylist.iter().any(|denied| *denied == path) {
            return Verdict::Denylisted;
        }
        match path.strip_prefix(self.package_root) {
            Some(rest) if !rest.contains('/') => Verdict::PackageOnly,
            _ => Verdict::PassThrough,
        }
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::BADGE
    }
}

/// Which safe-mode rule applies to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    OutsideRoots,
    Denylisted,
    /// Visible only if the filesystem reports a directory.
    PackageOnly,
    PassThrough,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::OutsideRoots => "outside library roots",
            Verdict::Denylisted => "denylisted",
            Verdict::PackageOnly => "package-only",
            Verdict::PassThrough => "pass-through",
        })
    }
}

/// Import-stat hook handed to the interpreter on every (re)start.
#[derive(Clone)]
pub struct ImportFilter {
    ctx: Arc<BootContext>,
    vfs: Arc<dyn VfsStat>,
    policy: SandboxPolicy,
}

impl ImportFilter {
    pub fn new(ctx: Arc<BootContext>, vfs: Arc<dyn VfsStat>) -> Self {
        Self::with_policy(ctx, vfs, SandboxPolicy::BADGE)
    }

    pub fn with_policy(ctx: Arc<BootContext>, vfs: Arc<dyn VfsStat>, policy: SandboxPolicy) -> Self {
        Self { ctx, vfs, policy }
    }

    pub fn context(&self) -> &Arc<BootContext> {
        &self.ctx
    }

    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    pub fn import_stat(&self, path: &str) -> ImportStat {
        if !self.ctx.safe_mode() {
            return self.vfs.import_stat(path);
        }

        match self.policy.evaluate(path) {
            Verdict::PassThrough => self.vfs.import_stat(path),
            Verdict::PackageOnly => match self.vfs.import_stat(path) {
                ImportStat::Dir => ImportStat::Dir,
                found => {
                    ::log::trace!(target: "sandbox", "{path}: {found} hidden (package-only)");
                    ImportStat::NoExist
                }
            },
            rule => {
                ::log::trace!(target: "sandbox", "{path}: rejected ({rule})");
                ImportStat::NoExist
            }
        }
    }
}

impl VfsStat for ImportFilter {
    fn import_stat(&self, path: &str) -> ImportStat {
        ImportFilter::import_stat(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::reset::ResetCause;
    use core::sync::atomic::{AtomicUsize, Ordering};

    struct Fs {
        lookups: AtomicUsize,
    }

    impl VfsStat for Fs {
        fn import_stat(&self, path: &str) -> ImportStat {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            match path {
                "/lib/os" | "/lib/widgets" | "/etc/passwd" => ImportStat::File,
                "/lib/badge" => ImportStat::Dir,
                "/lib/widgets/helper" => ImportStat::File,
                _ => ImportStat::NoExist,
            }
        }
    }

    fn filter(safe_mode: bool) -> (ImportFilter, Arc<Fs>) {
        let fs = Arc::new(Fs { lookups: AtomicUsize::new(0) });
        let ctx = Arc::new(BootContext::new(ResetCause::PowerOn, safe_mode));
        (ImportFilter::new(ctx, fs.clone()), fs)
    }

    #[test]
    fn policy_screening() {
        let p = SandboxPolicy::BADGE;
        assert_eq!(p.evaluate("/etc/passwd"), Verdict::OutsideRoots);
        assert_eq!(p.evaluate("/lib"), Verdict::OutsideRoots);
        assert_eq!(p.evaluate("/lib/time"), Verdict::Denylisted);
        assert_eq!(p.evaluate("/lib/time/x"), Verdict::PassThrough);
        assert_eq!(p.evaluate("/lib/widgets"), Verdict::PackageOnly);
        assert_eq!(p.evaluate("/bpp/lib/widgets"), Verdict::PassThrough);
        assert_eq!(p.evaluate("/sdcard/lib/a/b"), Verdict::PassThrough);
    }

    #[test]
    fn safe_mode_off_is_a_pass_through() {
        let (f, fs) = filter(false);
        assert_eq!(f.import_stat("/lib/os"), ImportStat::File);
        assert_eq!(f.import_stat("/etc/passwd"), ImportStat::File);
        assert_eq!(fs.lookups.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn safe_mode_rejections_skip_the_filesystem() {
        let (f, fs) = filter(true);
        assert_eq!(f.import_stat("/lib/os"), ImportStat::NoExist);
        assert_eq!(f.import_stat("/etc/passwd"), ImportStat::NoExist);
        assert_eq!(fs.lookups.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn safe_mode_top_level_lib_entries_must_be_packages() {
        let (f, _) = filter(true);
        assert_eq!(f.import_stat("/lib/widgets"), ImportStat::NoExist);
        assert_eq!(f.import_stat("/lib/badge"), ImportStat::Dir);
        assert_eq!(f.import_stat("/lib/widgets/helper"), ImportStat::File);
    }
}
