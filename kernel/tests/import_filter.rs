mod common;

use std::sync::Arc;

use badge_kernel::boot::reset::ResetCause;
use badge_kernel::boot::BootContext;
use badge_kernel::modules::{ImportFilter, ImportStat, SandboxPolicy};
use common::MockFs;
use pretty_assertions::assert_eq;

fn filter(safe_mode: bool) -> ImportFilter {
    let fs = MockFs::with(&[
        ("/lib/os", ImportStat::File),
        ("/lib/json", ImportStat::Dir),
        ("/lib/widgets", ImportStat::File),
        ("/lib/widgets/helper", ImportStat::File),
        ("/lib/badge", ImportStat::Dir),
        ("/lib/fifo", ImportStat::Other),
        ("/bpp/lib/app", ImportStat::File),
        ("/sdcard/lib/game", ImportStat::Dir),
        ("/etc/passwd", ImportStat::File),
        ("main", ImportStat::File),
    ]);
    ImportFilter::new(Arc::new(BootContext::new(ResetCause::PowerOn, safe_mode)), fs)
}

#[test]
fn without_safe_mode_every_path_is_a_plain_lookup() {
    let f = filter(false);
    assert_eq!(f.import_stat("/lib/os"), ImportStat::File);
    assert_eq!(f.import_stat("/lib/json"), ImportStat::Dir);
    assert_eq!(f.import_stat("/lib/widgets"), ImportStat::File);
    assert_eq!(f.import_stat("/etc/passwd"), ImportStat::File);
    assert_eq!(f.import_stat("main"), ImportStat::File);
}

#[test]
fn safe_mode_hides_the_denylist_even_for_packages() {
    let f = filter(true);
    for denied in SandboxPolicy::BADGE.denylist {
        assert_eq!(f.import_stat(denied), ImportStat::NoExist, "{denied}");
    }
}

#[test]
fn safe_mode_hides_paths_outside_the_library_roots() {
    let f = filter(true);
    assert_eq!(f.import_stat("/etc/passwd"), ImportStat::NoExist);
    assert_eq!(f.import_stat("main"), ImportStat::NoExist);
    assert_eq!(f.import_stat("/libx/thing"), ImportStat::NoExist);
}

#[test]
fn safe_mode_only_exposes_packages_at_the_top_of_lib() {
    let f = filter(true);
    assert_eq!(f.import_stat("/lib/widgets"), ImportStat::NoExist);
    assert_eq!(f.import_stat("/lib/fifo"), ImportStat::NoExist);
    assert_eq!(f.import_stat("/lib/badge"), ImportStat::Dir);
    assert_eq!(f.import_stat("/lib/widgets/helper"), ImportStat::File);
}

#[test]
fn other_roots_resolve_normally_in_safe_mode() {
    let f = filter(true);
    assert_eq!(f.import_stat("/bpp/lib/app"), ImportStat::File);
    assert_eq!(f.import_stat("/sdcard/lib/game"), ImportStat::Dir);
    assert_eq!(f.import_stat("/sdcard/lib/missing"), ImportStat::NoExist);
}
