use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use super::Selection;
use super::links::links_to_unmake;
use crate::inventory::{InventoryItem, LinkItem};
use crate::logging::Logger;

/// Select every folder and file last modified strictly before `cutoff`.
///
/// When `trigger` names a file, any folder holding a file of that name which
/// is itself older than `cutoff` is selected first, whatever the age of the
/// rest of the folder. Missing or unreadable trigger files fall through to
/// the general rule.
///
/// The inputs are only read; callers keep their lists intact.
pub fn select_by_age(
    cutoff: SystemTime,
    folders: &[InventoryItem],
    files: &[InventoryItem],
    links: &[LinkItem],
    trigger: Option<&str>,
    log: &Logger,
) -> Selection {
    log.verbose(1, "Getting date-based deletable inventory:");

    let (triggered, remaining) = match trigger {
        Some(name) => split_triggered(cutoff, folders, name, log),
        None => (Vec::new(), folders.to_vec()),
    };

    let mut freed_bytes = 0u64;
    let mut take = |item: &InventoryItem| {
        freed_bytes = freed_bytes.saturating_add(item.size);
        item.path.clone()
    };

    let mut delete_folders: Vec<PathBuf> = triggered.iter().map(&mut take).collect();
    delete_folders.extend(
        remaining
            .iter()
            .filter(|folder| folder.modified < cutoff)
            .map(&mut take),
    );
    let delete_files: Vec<PathBuf> = files
        .iter()
        .filter(|file| file.modified < cutoff)
        .map(&mut take)
        .collect();

    let delete_links = links_to_unmake(links, &delete_folders, &delete_files);

    Selection {
        folders: delete_folders,
        files: delete_files,
        links: delete_links,
        freed_bytes,
    }
    .logged(log)
}

/// Partition `folders` into those condemned by a stale trigger file and the
/// rest, keeping inventory order in both.
fn split_triggered(
    cutoff: SystemTime,
    folders: &[InventoryItem],
    trigger: &str,
    log: &Logger,
) -> (Vec<InventoryItem>, Vec<InventoryItem>) {
    folders.iter().cloned().partition(|folder| {
        let trigger_path = folder.path.join(trigger);
        match fs::metadata(&trigger_path).and_then(|metadata| metadata.modified()) {
            Ok(modified) if modified < cutoff => {
                log.verbose(
                    2,
                    format!("    Stale trigger file: {}", trigger_path.display()),
                );
                true
            }
            _ => false,
        }
    })
}
