//! Moving album directories to their resolved destination.

use std::fs;

use crate::error::{Error, Result};
use crate::model::AlbumLocation;

/// Move an album directory to its resolved target.
///
/// Returns `Ok(true)` when a move happened (or would happen, in dry run) and
/// `Ok(false)` when the album is already in place. The destination check runs
/// in dry run too, so both modes report the same outcome.
pub fn relocate(location: &AlbumLocation, dry_run: bool) -> Result<bool> {
    let target = location
        .target_path
        .as_deref()
        .ok_or_else(|| Error::TargetNotResolved(location.current_path.clone()))?;

    if location.is_in_place() {
        return Ok(false);
    }

    if fs::symlink_metadata(target).is_ok() {
        return Err(Error::DestinationExists(target.to_path_buf()));
    }

    if dry_run {
        tracing::debug!(
            from = %location.relative_current().display(),
            to = ?location.relative_target(),
            "Would move album"
        );
        return Ok(true);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::rename(&location.current_path, target).map_err(|source| Error::Move {
        from: location.current_path.clone(),
        to: target.to_path_buf(),
        source,
    })?;

    tracing::info!(
        from = %location.relative_current().display(),
        to = ?location.relative_target(),
        "Moved album"
    );
    Ok(true)
}
