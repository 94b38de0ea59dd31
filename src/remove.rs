//! Removing a [`Selection`] from disk.
//!
//! The filesystem calls go through the [`Remover`] trait so a run can be
//! observed or faked. Failures never stop the batch: each one is reported as
//! a [`CleanupError::Removal`] warning and counted in the [`RemovalReport`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::CleanupError;
use crate::logging::Logger;
use crate::select::Selection;

/// The filesystem operations a cleanup needs.
pub trait Remover {
    /// Remove a symbolic link itself, never its target
    fn unlink(&mut self, path: &Path) -> io::Result<()>;

    /// Remove a regular file
    fn remove_file(&mut self, path: &Path) -> io::Result<()>;

    /// Remove a folder and everything below it
    fn remove_dir_all(&mut self, path: &Path) -> io::Result<()>;
}

/// [`Remover`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn unlink(&mut self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            // Directory symlinks on Windows are removed as directories
            #[cfg(windows)]
            Err(_) if path.is_symlink() => fs::remove_dir(path),
            result => result,
        }
    }

    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

/// Tally for one category of removed items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalCounts {
    pub removed: usize,
    pub failed: usize,
}

impl RemovalCounts {
    fn record(&mut self, result: &io::Result<()>) {
        match result {
            Ok(()) => self.removed += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Outcome of [`remove_selection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub links: RemovalCounts,
    pub files: RemovalCounts,
    pub folders: RemovalCounts,
}

impl RemovalReport {
    /// Total number of items that could not be removed
    pub fn failed(&self) -> usize {
        self.links.failed + self.files.failed + self.folders.failed
    }
}

/// Remove everything in `selection`: links first, then files, then folders.
///
/// Links go first so none is left pointing into something already gone.
pub fn remove_selection<R: Remover + ?Sized>(
    selection: &Selection,
    remover: &mut R,
    log: &Logger,
) -> RemovalReport {
    let mut report = RemovalReport::default();

    if !selection.links.is_empty() {
        log.verbose(1, "Removing bad links:");
    }
    remove_each(&selection.links, &mut report.links, log, |path| {
        remover.unlink(path)
    });

    if !selection.files.is_empty() {
        log.verbose(1, "Removing files:");
    }
    remove_each(&selection.files, &mut report.files, log, |path| {
        remover.remove_file(path)
    });

    if !selection.folders.is_empty() {
        log.verbose(1, "Removing folders:");
    }
    remove_each(&selection.folders, &mut report.folders, log, |path| {
        remover.remove_dir_all(path)
    });

    report
}

fn remove_each(
    paths: &[PathBuf],
    counts: &mut RemovalCounts,
    log: &Logger,
    mut remove: impl FnMut(&Path) -> io::Result<()>,
) {
    for path in paths {
        log.verbose(1, format!("    {}", path.display()));
        let result = remove(path);
        counts.record(&result);
        if let Err(source) = result {
            let reason = source.to_string();
            let err = CleanupError::Removal {
                path: path.clone(),
                source,
            };
            log.warn(format!("{err}: {reason}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    /// Records every call and fails on the listed paths
    #[derive(Default)]
    struct RecordingRemover {
        calls: Vec<(&'static str, PathBuf)>,
        fail_on: Vec<PathBuf>,
    }

    impl RecordingRemover {
        fn call(&mut self, kind: &'static str, path: &Path) -> io::Result<()> {
            self.calls.push((kind, path.to_path_buf()));
            if self.fail_on.iter().any(|p| p == path) {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            } else {
                Ok(())
            }
        }
    }

    impl Remover for RecordingRemover {
        fn unlink(&mut self, path: &Path) -> io::Result<()> {
            self.call("unlink", path)
        }

        fn remove_file(&mut self, path: &Path) -> io::Result<()> {
            self.call("file", path)
        }

        fn remove_dir_all(&mut self, path: &Path) -> io::Result<()> {
            self.call("folder", path)
        }
    }

    fn selection() -> Selection {
        Selection {
            folders: vec![PathBuf::from("/t/A"), PathBuf::from("/t/C")],
            files: vec![PathBuf::from("/t/B.txt")],
            links: vec![PathBuf::from("/t/L")],
            freed_bytes: 150,
        }
    }

    #[test]
    fn test_links_then_files_then_folders() {
        let mut remover = RecordingRemover::default();
        let report = remove_selection(&selection(), &mut remover, &Logger::silent());

        let kinds: Vec<_> = remover.calls.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, ["unlink", "file", "folder", "folder"]);
        assert_eq!(report.links.removed, 1);
        assert_eq!(report.files.removed, 1);
        assert_eq!(report.folders.removed, 2);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_failure_does_not_stop_the_batch() {
        let mut remover = RecordingRemover {
            fail_on: vec![PathBuf::from("/t/B.txt"), PathBuf::from("/t/A")],
            ..Default::default()
        };
        let report = remove_selection(&selection(), &mut remover, &Logger::silent());

        assert_eq!(remover.calls.len(), 4);
        assert_eq!(
            report.files,
            RemovalCounts {
                removed: 0,
                failed: 1
            }
        );
        assert_eq!(
            report.folders,
            RemovalCounts {
                removed: 1,
                failed: 1
            }
        );
        assert_eq!(report.failed(), 2);
    }

    #[test]
    fn test_empty_selection_touches_nothing() {
        let mut remover = RecordingRemover::default();
        let report = remove_selection(&Selection::default(), &mut remover, &Logger::silent());
        assert!(remover.calls.is_empty());
        assert_eq!(report, RemovalReport::default());
    }

    #[test]
    fn test_fs_remover_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("A/deep")).unwrap();
        fs::write(root.join("A/deep/x"), "x").unwrap();
        fs::write(root.join("B.txt"), "b").unwrap();

        let selection = Selection {
            folders: vec![root.join("A")],
            files: vec![root.join("B.txt"), root.join("gone.txt")],
            links: Vec::new(),
            freed_bytes: 0,
        };
        let report = remove_selection(&selection, &mut FsRemover, &Logger::silent());

        assert!(!root.join("A").exists());
        assert!(!root.join("B.txt").exists());
        assert_eq!(report.files.removed, 1);
        assert_eq!(report.files.failed, 1);
        assert_eq!(report.folders.removed, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_remover_unlinks_without_touching_target() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("kept")).unwrap();
        fs::write(root.join("kept/file"), "x").unwrap();
        std::os::unix::fs::symlink(root.join("kept"), root.join("L")).unwrap();

        let selection = Selection {
            links: vec![root.join("L")],
            ..Default::default()
        };
        let report = remove_selection(&selection, &mut FsRemover, &Logger::silent());

        assert_eq!(report.links.removed, 1);
        assert!(root.join("L").symlink_metadata().is_err());
        assert!(root.join("kept/file").exists());
    }
}
