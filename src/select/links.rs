use std::path::PathBuf;

use crate::inventory::LinkItem;

/// Pick the links that must be unmade once `folders` and `files` are gone.
///
/// A link goes if it is internal and points exactly at a removed folder or
/// file, or if the link itself or its target lies inside a removed folder.
/// Prefix tests compare whole path components.
pub(crate) fn links_to_unmake(
    links: &[LinkItem],
    folders: &[PathBuf],
    files: &[PathBuf],
) -> Vec<PathBuf> {
    links
        .iter()
        .filter(|link| {
            let targets_removed_item = link.internal
                && (folders.contains(&link.target) || files.contains(&link.target));

            targets_removed_item
                || folders
                    .iter()
                    .any(|folder| link.path.starts_with(folder) || link.target.starts_with(folder))
        })
        .map(|link| link.path.clone())
        .collect()
}
