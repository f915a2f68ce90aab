//! Removal of directories left empty by moves.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::scanner::is_vanished;

/// Remove every empty directory under `root`, repeating until a pass removes
/// nothing. The root itself is kept even when empty.
///
/// Returns the number of directories removed.
pub fn delete_empty_folders(root: &Path) -> Result<usize> {
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    let mut total = 0;
    loop {
        let removed = delete_pass(root);
        if removed == 0 {
            break;
        }
        total += removed;
    }

    if total > 0 {
        tracing::info!(count = total, "Removed empty directories");
    }
    Ok(total)
}

/// One bottom-up walk; children are visited before their parent, so whole
/// empty chains usually go in a single pass.
fn delete_pass(root: &Path) -> usize {
    let mut removed = 0;
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_vanished(&e) => continue,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() || !is_empty_dir(entry.path()) {
            continue;
        }

        match fs::remove_dir(entry.path()) {
            Ok(()) => {
                tracing::debug!(path = %entry.path().display(), "Removed empty directory");
                removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {:?}: {}", entry.path(), e),
        }
    }
    removed
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
