//! Walking the collection.
//!
//! The collection is walked with `walkdir`, entries sorted by file name so a
//! run is reproducible. The tree may change while it is walked (albums are
//! moved out from under the walker), so entries that vanished are skipped
//! rather than treated as errors.

pub mod sort;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub use sort::{SortStats, sort_albums};

/// What a file is, judged by its extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// flac
    Lossless,
    /// jpg, jpeg, png
    CoverArt,
    /// mp3, wma, m4a, aac, ogg, opus
    LossyAudio,
    /// Anything else, including files without an extension
    Other,
}

/// Classify a file by extension.
pub fn classify_extension(path: &Path) -> FileKind {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileKind::Other;
    };
    match ext.to_lowercase().as_str() {
        "flac" => FileKind::Lossless,
        "jpg" | "jpeg" | "png" => FileKind::CoverArt,
        "mp3" | "wma" | "m4a" | "aac" | "ogg" | "opus" => FileKind::LossyAudio,
        _ => FileKind::Other,
    }
}

/// Playable tracks listed in playlists.
pub fn is_track(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "flac" | "mp3"))
}

/// A walker over `root`, pre-order, entries sorted by file name.
pub fn walk_sorted(root: &Path) -> WalkDir {
    WalkDir::new(root).sort_by_file_name()
}

/// Whether a walk error only means the entry disappeared mid-walk.
pub fn is_vanished(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == ErrorKind::NotFound)
}

/// Immediate files of a directory, sorted by name.
pub fn list_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
