//! Checking album folders for non-lossless content.
//!
//! Only file extensions are looked at; audio is never decoded.

use std::io::ErrorKind;
use std::path::Path;

use super::types::{AlbumAudit, AuditFlags, AuditStats};
use crate::error::{Error, Result};
use crate::model::AlbumLocation;
use crate::scanner::{FileKind, classify_extension, is_vanished, list_files, walk_sorted};

/// Audit every album folder under `root`.
pub fn find_lossy_albums(root: &Path) -> Result<AuditStats> {
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    let mut stats = AuditStats::default();
    for entry in walk_sorted(root).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) if is_vanished(&e) => continue,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let mut location = AlbumLocation::new(root, entry.path());
        if !location.is_album() {
            continue;
        }

        let files = match list_files(entry.path()) {
            Ok(files) => files,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(Error::from(e).context(format!("Failed to list {:?}", entry.path()))),
        };
        stats.record(audit_album(&location, &files));
    }

    tracing::info!(
        checked = stats.checked,
        non_lossless = stats.non_lossless,
        unflagged = stats.unflagged,
        falsely_flagged = stats.falsely_flagged,
        "Audited collection"
    );
    Ok(stats)
}

/// Audit one album from the files it holds.
pub fn audit_album(location: &AlbumLocation, files: &[impl AsRef<Path>]) -> AlbumAudit {
    let has_marker = location.identity().is_some_and(|identity| identity.is_lossy);
    let mut flags = AuditFlags::empty();
    let mut has_lossy_audio = false;
    let mut suspicious = Vec::new();

    for file in files {
        let file = file.as_ref();
        match classify_extension(file) {
            FileKind::Lossless | FileKind::CoverArt => {}
            FileKind::LossyAudio => {
                flags |= AuditFlags::NON_LOSSLESS;
                has_lossy_audio = true;
            }
            FileKind::Other => {
                flags |= AuditFlags::NON_LOSSLESS | AuditFlags::SUSPICIOUS_FILES;
                tracing::warn!(album = %location.relative_current().display(), "Suspicious file {:?}", file);
                suspicious.push(file.file_name().map_or_else(|| file.to_path_buf(), Into::into));
            }
        }
    }

    if flags.contains(AuditFlags::NON_LOSSLESS) && !has_marker {
        flags |= AuditFlags::UNFLAGGED;
    }
    if has_marker && !has_lossy_audio && suspicious.is_empty() {
        flags |= AuditFlags::FALSELY_FLAGGED;
    }

    AlbumAudit {
        path: location.relative_current().to_path_buf(),
        flags,
        suspicious,
    }
}
