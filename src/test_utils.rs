//! Test utilities and fixtures for music-shelf tests.
//!
//! This module provides a throwaway collection on disk plus the genre and
//! alias tables used across scenarios, to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use music_shelf::test_utils::{temp_library, sample_genres};
//!
//! #[test]
//! fn test_something() {
//!     let library = temp_library();
//!     let album = library.add_album("INCOMING/arthi (2000) jqojdoijd", &["01.flac"]);
//!     // ... test logic
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::LibraryPaths;
use crate::library::{AliasTable, ArtistAliases, Genre, GenreTable};

/// A collection root and playlist directory inside a temporary directory.
///
/// Everything is deleted when the value is dropped; keep it alive for the
/// duration of the test.
pub struct TempLibrary {
    pub dir: TempDir,
    pub paths: LibraryPaths,
}

/// Creates an empty collection with default staging subdirectories.
///
/// The root is canonicalized so it compares equal to paths produced by
/// config loading.
pub fn temp_library() -> TempLibrary {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let base = fs::canonicalize(dir.path()).expect("Failed to canonicalize temp directory");
    let root = base.join("music");
    let playlists = base.join("playlists");
    fs::create_dir_all(&root).expect("Failed to create root");
    fs::create_dir_all(&playlists).expect("Failed to create playlist directory");

    TempLibrary {
        dir,
        paths: LibraryPaths::new(root, playlists),
    }
}

impl TempLibrary {
    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    /// Create an album directory (relative to the root) holding empty files.
    pub fn add_album(&self, relative: &str, files: &[&str]) -> PathBuf {
        let album = self.paths.root.join(relative);
        fs::create_dir_all(&album).expect("Failed to create album directory");
        for file in files {
            fs::write(album.join(file), b"").expect("Failed to create album file");
        }
        album
    }
}

/// Converts a slice of `&str` into owned strings.
pub fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// `genre1` lists `arthi` and the main alias `PPP`; `compilations` lists one
/// various-artists title.
pub fn sample_genres() -> GenreTable {
    GenreTable::new(vec![
        Genre::new("genre1", strings(&["arthi", "PPP"])),
        Genre::new("compilations", strings(&["Various Artists | Hits"])),
    ])
}

/// `arthi東京?-4.` is an alternate name of `PPP`.
pub fn sample_aliases() -> AliasTable {
    AliasTable::new(vec![ArtistAliases::new("PPP", strings(&["arthi東京?-4."]))])
}
