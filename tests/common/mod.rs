#![allow(dead_code)]

use std::path::Path;
use std::time::{Duration, SystemTime};

use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use filetime::FileTime;

pub const DAY: u64 = 24 * 60 * 60;

/// Set the modification time of `path` to `days` days ago.
pub fn age(path: &Path, days: u64) {
    let mtime = SystemTime::now() - Duration::from_secs(days * DAY);
    filetime::set_file_mtime(path, FileTime::from_system_time(mtime)).unwrap();
}

/// Create `name` under `temp` holding `size` bytes, last modified `days` ago.
///
/// Parent directories are created as needed; their times are not touched, so
/// age folders with [`age`] once their contents are in place.
pub fn aged_file(temp: &TempDir, name: &str, size: usize, days: u64) -> ChildPath {
    let file = temp.child(name);
    file.write_binary(&vec![b'x'; size]).unwrap();
    age(file.path(), days);
    file
}

/// Create a folder with one file of `size` bytes, all `days` old.
pub fn aged_dir(temp: &TempDir, name: &str, size: usize, days: u64) -> ChildPath {
    let dir = temp.child(name);
    aged_file(temp, &format!("{name}/content.bin"), size, days);
    age(dir.path(), days);
    dir
}
