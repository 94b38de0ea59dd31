//! End-to-end cleanup runs through `commands::execute`

mod common;

use std::io::Cursor;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use cleanup_manager::cli::Cli;
use cleanup_manager::commands::{self, Cleanup};
use cleanup_manager::error::CleanupError;
use cleanup_manager::remove::FsRemover;
use cleanup_manager::select::{Policy, SizeOrder};
use predicates::prelude::*;

use crate::common::{age, aged_dir, aged_file};

#[test]
fn test_keep_after_removes_stale_items() {
    let temp = TempDir::new().unwrap();
    let stale_dir = aged_dir(&temp, "stale_dir", 100, 30);
    let stale_file = aged_file(&temp, "stale.log", 10, 30);
    let fresh_file = aged_file(&temp, "fresh.log", 10, 1);

    // One recent file keeps the whole folder
    aged_file(&temp, "mixed/old.bin", 500, 60);
    aged_file(&temp, "mixed/new.bin", 5, 1);
    let mixed = temp.child("mixed");
    age(mixed.path(), 60);

    let cli = Cli::builder()
        .target(temp.path())
        .keep_after("7d")
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    commands::execute(&cli).unwrap();

    stale_dir.assert(predicate::path::missing());
    stale_file.assert(predicate::path::missing());
    fresh_file.assert(predicate::path::exists());
    mixed.child("old.bin").assert(predicate::path::exists());
    mixed.child("new.bin").assert(predicate::path::exists());
}

#[test]
fn test_default_policy_is_a_week() {
    let temp = TempDir::new().unwrap();
    let old = aged_file(&temp, "old.txt", 1, 30);
    let new = aged_file(&temp, "new.txt", 1, 0);

    let cli = Cli::builder()
        .target(temp.path())
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    commands::execute(&cli).unwrap();

    old.assert(predicate::path::missing());
    new.assert(predicate::path::exists());
}

#[test]
fn test_absolute_keep_after_date() {
    let temp = TempDir::new().unwrap();
    let ancient = aged_file(&temp, "ancient.txt", 1, 0);
    // 1999-06-01T00:00:00Z
    filetime::set_file_mtime(ancient.path(), filetime::FileTime::from_unix_time(928_195_200, 0))
        .unwrap();
    let recent = aged_file(&temp, "recent.txt", 1, 400);

    let cli = Cli::builder()
        .target(temp.path())
        .keep_after("01.01.2000")
        .date_format("%d.%m.%Y")
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    commands::execute(&cli).unwrap();

    ancient.assert(predicate::path::missing());
    recent.assert(predicate::path::exists());
}

#[test]
fn test_trigger_file_condemns_folder() {
    let temp = TempDir::new().unwrap();
    aged_file(&temp, "expired/.expire", 0, 30);
    aged_file(&temp, "expired/work.bin", 10, 0);
    aged_file(&temp, "renewed/.expire", 0, 1);
    aged_file(&temp, "renewed/work.bin", 10, 0);
    aged_file(&temp, "unmarked/work.bin", 10, 0);

    let cli = Cli::builder()
        .target(temp.path())
        .keep_after("7d")
        .trigger(".expire")
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    commands::execute(&cli).unwrap();

    temp.child("expired").assert(predicate::path::missing());
    temp.child("renewed").assert(predicate::path::exists());
    temp.child("unmarked").assert(predicate::path::exists());
}

#[test]
fn test_freeup_oldest_first() {
    let temp = TempDir::new().unwrap();
    let oldest = aged_dir(&temp, "oldest", 100, 30);
    let middle = aged_file(&temp, "middle.bin", 80, 20);
    let newest = aged_file(&temp, "newest.bin", 40, 10);

    let cli = Cli::builder()
        .target(temp.path())
        .freeup("150")
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    commands::execute(&cli).unwrap();

    // 100 fits, 80 would overshoot, 40 fits
    oldest.assert(predicate::path::missing());
    middle.assert(predicate::path::exists());
    newest.assert(predicate::path::missing());
}

#[test]
fn test_freeup_with_overflow() {
    let temp = TempDir::new().unwrap();
    let oldest = aged_dir(&temp, "oldest", 100, 30);
    let middle = aged_file(&temp, "middle.bin", 80, 20);
    let newest = aged_file(&temp, "newest.bin", 40, 10);

    let cli = Cli::builder()
        .target(temp.path())
        .freeup("150")
        .overflow(true)
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    commands::execute(&cli).unwrap();

    oldest.assert(predicate::path::missing());
    middle.assert(predicate::path::missing());
    newest.assert(predicate::path::exists());
}

#[test]
fn test_freeup_largest_first() {
    let temp = TempDir::new().unwrap();
    let large = aged_file(&temp, "large.bin", 120, 1);
    let medium = aged_dir(&temp, "medium", 100, 30);
    let small = aged_file(&temp, "small.bin", 30, 5);

    let cli = Cli::builder()
        .target(temp.path())
        .freeup("150")
        .order(SizeOrder::LargestFirst)
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    commands::execute(&cli).unwrap();

    large.assert(predicate::path::missing());
    medium.assert(predicate::path::exists());
    small.assert(predicate::path::missing());
}

#[test]
fn test_dry_run_leaves_everything() {
    let temp = TempDir::new().unwrap();
    let stale_dir = aged_dir(&temp, "stale_dir", 100, 30);
    let stale_file = aged_file(&temp, "stale.log", 10, 30);

    let cli = Cli::builder()
        .target(temp.path())
        .keep_after("1d")
        .dry_run(true)
        .quiet(true)
        .build()
        .unwrap();
    commands::execute(&cli).unwrap();

    stale_dir.assert(predicate::path::is_dir());
    stale_file.assert(predicate::path::is_file());
}

#[test]
fn test_declined_prompt_keeps_everything() {
    let temp = TempDir::new().unwrap();
    let stale = aged_file(&temp, "stale.log", 10, 30);
    let mut output = Vec::new();

    let result = Cleanup::builder()
        .target_dir(temp.path())
        .policy(Policy::FreeUp {
            target_bytes: 10,
            order: SizeOrder::OldestFirst,
            allow_overflow: false,
        })
        .build()
        .unwrap()
        .run_with(&mut FsRemover, &mut Cursor::new("no\n"), &mut output);

    assert!(matches!(result, Err(CleanupError::Aborted)));
    stale.assert(predicate::path::exists());
    let output = String::from_utf8(output).unwrap();
    assert!(predicate::str::contains("These items will be deleted:").eval(output.as_str()));
    assert!(predicate::str::contains("stale.log").eval(output.as_str()));
}

#[test]
fn test_invalid_inputs_fail_before_scanning() {
    let temp = TempDir::new().unwrap();
    let kept = aged_file(&temp, "kept.txt", 1, 30);

    let cli = Cli::builder()
        .target(temp.path().join("missing"))
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    assert!(matches!(
        commands::execute(&cli),
        Err(CleanupError::InvalidTarget(_))
    ));

    let cli = Cli::builder()
        .target(kept.path())
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    assert!(matches!(
        commands::execute(&cli),
        Err(CleanupError::InvalidTarget(_))
    ));

    let cli = Cli::builder()
        .target(temp.path())
        .keep_after("last tuesday")
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    assert!(matches!(
        commands::execute(&cli),
        Err(CleanupError::InvalidDate(..))
    ));

    let cli = Cli::builder()
        .target(temp.path())
        .freeup("10gf")
        .skip_prompt(true)
        .quiet(true)
        .build()
        .unwrap();
    assert!(matches!(
        commands::execute(&cli),
        Err(CleanupError::InvalidSize(..))
    ));

    kept.assert(predicate::path::exists());
}
