use std::path::PathBuf;

use super::Selection;
use super::links::links_to_unmake;
use crate::inventory::{InventoryItem, LinkItem};
use crate::logging::Logger;
use crate::size::format_bytes;

/// Which items a size-target selection removes first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeOrder {
    /// Least recently modified first
    #[default]
    OldestFirst,
    /// Largest first
    LargestFirst,
}

impl SizeOrder {
    /// Whether `a` comes strictly before `b` within one pool
    fn outranks(self, a: &InventoryItem, b: &InventoryItem) -> bool {
        match self {
            Self::OldestFirst => a.modified < b.modified,
            Self::LargestFirst => a.size > b.size,
        }
    }

    /// Ties between the two pools go to the folder.
    fn prefers_folder(self, folder: &InventoryItem, file: &InventoryItem) -> bool {
        match self {
            Self::OldestFirst => folder.modified <= file.modified,
            Self::LargestFirst => folder.size >= file.size,
        }
    }
}

/// Index of the first item that nothing else in `items` outranks.
fn extreme(items: &[InventoryItem], order: SizeOrder) -> Option<usize> {
    let mut best = None;
    for (index, item) in items.iter().enumerate() {
        match best {
            Some(current) if !order.outranks(item, &items[current]) => {}
            _ => best = Some(index),
        }
    }
    best
}

enum Pool {
    Folders,
    Files,
}

/// Greedily select folders and files until `target_bytes` would be freed.
///
/// Every pass takes the leading folder and the leading file under `order`,
/// prefers the folder on ties, and retires the winner from its pool. The
/// winner is kept only if it fits in the remaining budget, unless
/// `allow_overflow` is set. The loop stops once the budget is met or both
/// pools are empty, so it runs at most `folders.len() + files.len()` times
/// and may free less than requested.
///
/// The inputs are only read; callers keep their lists intact.
pub fn select_by_size(
    target_bytes: u64,
    order: SizeOrder,
    allow_overflow: bool,
    folders: &[InventoryItem],
    files: &[InventoryItem],
    links: &[LinkItem],
    log: &Logger,
) -> Selection {
    log.verbose(1, "Getting size-based deletable inventory:");

    let mut folders = folders.to_vec();
    let mut files = files.to_vec();
    let mut delete_folders: Vec<PathBuf> = Vec::new();
    let mut delete_files: Vec<PathBuf> = Vec::new();
    let mut accumulated = 0u64;

    while accumulated < target_bytes {
        log.verbose(
            2,
            format!(
                "  target={} accumulated={}",
                format_bytes(target_bytes),
                format_bytes(accumulated)
            ),
        );

        let pool = match (extreme(&folders, order), extreme(&files, order)) {
            (Some(folder), Some(file)) => {
                if order.prefers_folder(&folders[folder], &files[file]) {
                    (Pool::Folders, folder)
                } else {
                    (Pool::Files, file)
                }
            }
            (Some(folder), None) => (Pool::Folders, folder),
            (None, Some(file)) => (Pool::Files, file),
            (None, None) => break,
        };

        let (candidate, chosen) = match pool {
            (Pool::Folders, index) => (folders.remove(index), &mut delete_folders),
            (Pool::Files, index) => (files.remove(index), &mut delete_files),
        };

        if allow_overflow || candidate.size <= target_bytes - accumulated {
            log.verbose(
                2,
                format!(
                    "    taking {} ({})",
                    candidate.path.display(),
                    format_bytes(candidate.size)
                ),
            );
            accumulated = accumulated.saturating_add(candidate.size);
            chosen.push(candidate.path);
        } else {
            log.verbose(
                2,
                format!(
                    "    passing over {} ({}), over budget",
                    candidate.path.display(),
                    format_bytes(candidate.size)
                ),
            );
        }
    }

    let delete_links = links_to_unmake(links, &delete_folders, &delete_files);

    Selection {
        folders: delete_folders,
        files: delete_files,
        links: delete_links,
        freed_bytes: accumulated,
    }
    .logged(log)
}
