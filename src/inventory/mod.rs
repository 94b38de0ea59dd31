//! Top-level inventory of a cleanup target.
//!
//! Each immediate child of the target is classified as a folder, a file or a
//! link. Folders are atomic: their age is the newest modification time found
//! anywhere beneath them and their size is the total of every regular file
//! they contain. Links are gathered at the top level and from inside every
//! folder so the selector can tell which of them would be left dangling.
//!
//! # Example
//!
//! ```no_run
//! use cleanup_manager::Logger;
//! use cleanup_manager::inventory::build_inventory;
//!
//! let inventory = build_inventory("/srv/scratch", &Logger::new(1, false))?;
//! for folder in inventory.folders() {
//!     println!("{} {} bytes", folder.path.display(), folder.size);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::{CleanupError, Result};
use crate::logging::Logger;


/// A folder or file that may be selected for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub path: PathBuf,
    /// For folders, the newest modification time of the folder itself and
    /// everything beneath it.
    pub modified: SystemTime,
    /// For folders, the total size of every regular file beneath it.
    pub size: u64,
}

impl InventoryItem {
    pub fn new(path: impl Into<PathBuf>, modified: SystemTime, size: u64) -> Self {
        Self {
            path: path.into(),
            modified,
            size,
        }
    }
}

/// A symbolic link found at the top level or inside a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkItem {
    pub path: PathBuf,
    /// Fully resolved target of the link.
    pub target: PathBuf,
    /// Whether `target` lies inside the scanned directory.
    pub internal: bool,
}

impl LinkItem {
    pub fn new(path: impl Into<PathBuf>, target: impl Into<PathBuf>, internal: bool) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
            internal,
        }
    }
}

/// An entry left out of the inventory because it could not be examined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// The classified contents of one target directory.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    root: PathBuf,
    folders: Vec<InventoryItem>,
    files: Vec<InventoryItem>,
    links: Vec<LinkItem>,
    skipped: Vec<SkippedEntry>,
}

impl Inventory {
    /// Assemble an inventory from pre-computed parts.
    pub fn from_parts(
        root: impl Into<PathBuf>,
        folders: Vec<InventoryItem>,
        files: Vec<InventoryItem>,
        links: Vec<LinkItem>,
    ) -> Self {
        Self {
            root: root.into(),
            folders,
            files,
            links,
            skipped: Vec::new(),
        }
    }

    /// The canonical path of the scanned directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folders(&self) -> &[InventoryItem] {
        &self.folders
    }

    pub fn files(&self) -> &[InventoryItem] {
        &self.files
    }

    pub fn links(&self) -> &[LinkItem] {
        &self.links
    }

    /// Entries that vanished or could not be read during the scan. Folder
    /// ages and sizes do not include them.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    fn skip(&mut self, log: &Logger, path: &Path, source: std::io::Error) {
        let reason = source.to_string();
        let race = CleanupError::FilesystemRace {
            path: path.to_path_buf(),
            source,
        };
        log.verbose(1, format!("    {race}: {reason}"));
        self.skipped.push(SkippedEntry {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Unwrap a modification time, recording `path` as skipped when the
    /// platform cannot report one.
    fn modified_time(
        &mut self,
        log: &Logger,
        path: &Path,
        time: std::io::Result<SystemTime>,
    ) -> Option<SystemTime> {
        time.map_err(|source| self.skip(log, path, source)).ok()
    }
}

/// Scan `target` one level deep and aggregate every folder beneath it.
///
/// # Errors
///
/// Returns [`CleanupError::InvalidTarget`] if `target` does not exist or is
/// not a directory, and [`CleanupError::Io`] if it cannot be listed. Problems
/// with individual entries never fail the scan; see
/// [`Inventory::skipped`].
pub fn build_inventory(target: impl AsRef<Path>, log: &Logger) -> Result<Inventory> {
    let target = target.as_ref();
    let root = fs::canonicalize(target)
        .ok()
        .filter(|path| path.is_dir())
        .ok_or_else(|| CleanupError::InvalidTarget(target.to_path_buf()))?;

    log.verbose(1, "Getting top-level inventory:");

    let mut inventory = Inventory {
        root,
        ..Inventory::default()
    };
    let mut link_paths = Vec::new();

    for (path, metadata) in list_top_level(&mut inventory, log)? {
        if metadata.file_type().is_symlink() {
            log.verbose(1, format!("    Found link: {}", path.display()));
            link_paths.push(path);
        } else if metadata.is_dir() {
            log.verbose(1, format!("    Found folder: {}", path.display()));
            let folder = aggregate_folder(&path, &metadata, &mut inventory, &mut link_paths, log);
            inventory.folders.push(folder);
        } else {
            log.verbose(1, format!("    Found file: {}", path.display()));
            match stat_file(&path, &metadata) {
                Ok(file) => inventory.files.push(file),
                Err(source) => inventory.skip(log, &path, source),
            }
        }
    }

    let links = link_paths
        .into_iter()
        .map(|path| {
            let target = resolve_link(&path);
            let internal = target.starts_with(&inventory.root);
            LinkItem {
                path,
                target,
                internal,
            }
        })
        .collect();
    inventory.links = links;

    if !inventory.skipped.is_empty() {
        log.warn(format!(
            "{} entries could not be examined; folder ages and sizes may be understated",
            inventory.skipped.len()
        ));
    }

    Ok(inventory)
}

/// List the immediate children of the root in path order, with their
/// unfollowed metadata.
fn list_top_level(
    inventory: &mut Inventory,
    log: &Logger,
) -> Result<Vec<(PathBuf, fs::Metadata)>> {
    let root = inventory.root.clone();
    let entries = fs::read_dir(&root).map_err(|source| CleanupError::Io {
        path: root.clone(),
        source,
    })?;

    let mut children = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                inventory.skip(log, &root, source);
                continue;
            }
        };
        let path = entry.path();
        match fs::symlink_metadata(&path) {
            Ok(metadata) => children.push((path, metadata)),
            Err(source) => inventory.skip(log, &path, source),
        }
    }

    children.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(children)
}

fn stat_file(path: &Path, metadata: &fs::Metadata) -> std::io::Result<InventoryItem> {
    Ok(InventoryItem {
        path: path.to_path_buf(),
        modified: metadata.modified()?,
        size: metadata.len(),
    })
}

/// Walk a folder's whole subtree, folding in the age of every directory and
/// the age and size of every regular file. Links are collected, not
/// followed, and contribute neither age nor size.
fn aggregate_folder(
    folder: &Path,
    metadata: &fs::Metadata,
    inventory: &mut Inventory,
    link_paths: &mut Vec<PathBuf>,
    log: &Logger,
) -> InventoryItem {
    let mut modified = inventory
        .modified_time(log, folder, metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut size = 0u64;

    for entry in WalkDir::new(folder).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(folder).to_path_buf();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                inventory.skip(log, &path, source);
                continue;
            }
        };

        if entry.path_is_symlink() {
            log.verbose(
                2,
                format!("      Found nested link: {}", entry.path().display()),
            );
            link_paths.push(entry.into_path());
            continue;
        }

        let entry_metadata = match entry.metadata() {
            Ok(entry_metadata) => entry_metadata,
            Err(err) => {
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable"));
                inventory.skip(log, entry.path(), source);
                continue;
            }
        };
        let Some(entry_modified) =
            inventory.modified_time(log, entry.path(), entry_metadata.modified())
        else {
            continue;
        };

        if entry_metadata.is_file() {
            size += entry_metadata.len();
        }
        if entry_modified > modified {
            modified = entry_modified;
        }
    }

    InventoryItem {
        path: folder.to_path_buf(),
        modified,
        size,
    }
}

/// Links followed before a dangling chain is given up on.
const MAX_LINK_HOPS: usize = 40;

/// Resolve a link the way `realpath` does: fully canonical when the target
/// exists. Otherwise the chain is followed hop by hop, each raw target
/// anchored at its link's canonical parent with `.` and `..` folded away,
/// until a path that is not a link is reached.
fn resolve_link(link: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(link) {
        return resolved;
    }

    let mut current = link.to_path_buf();
    for _ in 0..MAX_LINK_HOPS {
        let Ok(raw) = fs::read_link(&current) else {
            break;
        };
        let parent = current.parent().unwrap_or(Path::new("/"));
        let parent = fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
        current = anchor(&normalize_lexically(&parent.join(raw)));

        if let Ok(resolved) = fs::canonicalize(&current) {
            return resolved;
        }
        if !fs::symlink_metadata(&current).is_ok_and(|meta| meta.file_type().is_symlink()) {
            break;
        }
    }
    current
}

/// Canonicalize the parent of a path that need not exist itself.
fn anchor(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
