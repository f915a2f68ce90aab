//! Core data models for the music collection.
//!
//! Defines [`AlbumIdentity`], what an album folder's name says about it, and
//! [`AlbumLocation`], where that folder is and where it should go.
//!
//! Nothing here is persisted: identities are derived from folder names each
//! time the collection is walked.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::metadata::{self, LOSSY_MARKER};

/// What an album folder name encodes: `Artist (Year) Title[ [MP3]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumIdentity {
    /// Artist as written in the folder name
    pub artist: String,
    /// Canonical artist name, `artist` unless an alias says otherwise
    pub main_alias: String,
    /// Four-digit release year
    pub year: String,
    /// Album title
    pub title: String,
    /// Folder name carries the lossy marker
    pub is_lossy: bool,
}

impl AlbumIdentity {
    /// The canonical folder name for this album.
    pub fn folder_name(&self) -> String {
        let mut name = format!("{} ({}) {}", self.artist, self.year, self.title);
        if self.is_lossy {
            name.push_str(LOSSY_MARKER);
        }
        name
    }
}

impl fmt::Display for AlbumIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_alias, self.folder_name())
    }
}

/// An album directory inside the collection root.
///
/// The identity is parsed lazily from the directory's base name and only
/// once. `target_path` stays `None` until the location has been resolved
/// against the genre and alias tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumLocation {
    /// Collection root (absolute)
    pub root: PathBuf,
    /// Where the album directory currently is (absolute)
    pub current_path: PathBuf,
    /// Where the album directory belongs (absolute), once resolved
    pub target_path: Option<PathBuf>,
    pub(crate) identity: Option<AlbumIdentity>,
}

impl AlbumLocation {
    pub fn new(root: impl Into<PathBuf>, current_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current_path: current_path.into(),
            target_path: None,
            identity: None,
        }
    }

    /// Base name of the album directory, if it is valid UTF-8.
    pub fn base_name(&self) -> Option<&str> {
        self.current_path.file_name().and_then(|n| n.to_str())
    }

    /// Parse the directory name, unless that already happened.
    pub fn identify(&mut self) -> Result<&AlbumIdentity> {
        if self.identity.is_none() {
            let name = self
                .base_name()
                .ok_or_else(|| Error::not_an_album(self.current_path.to_string_lossy()))?;
            self.identity = Some(metadata::parse_folder_name(name)?);
        }
        // Populated just above if it was missing
        self.identity
            .as_ref()
            .ok_or_else(|| Error::not_an_album(self.current_path.to_string_lossy()))
    }

    /// Whether the directory name follows the album pattern.
    pub fn is_album(&mut self) -> bool {
        self.identify().is_ok()
    }

    /// The parsed identity, if [`identify`](Self::identify) succeeded.
    pub fn identity(&self) -> Option<&AlbumIdentity> {
        self.identity.as_ref()
    }

    /// Whether the album currently sits in the incoming staging directory.
    pub fn is_new(&self, incoming_subdir: &str) -> bool {
        self.current_path
            .starts_with(self.root.join(incoming_subdir))
    }

    /// Current path relative to the root.
    pub fn relative_current(&self) -> &Path {
        self.current_path
            .strip_prefix(&self.root)
            .unwrap_or(&self.current_path)
    }

    /// Target path relative to the root, once resolved.
    pub fn relative_target(&self) -> Option<&Path> {
        self.target_path
            .as_deref()
            .map(|t| t.strip_prefix(&self.root).unwrap_or(t))
    }

    /// Whether the album already sits where it belongs.
    pub fn is_in_place(&self) -> bool {
        self.target_path.as_deref() == Some(self.current_path.as_path())
    }
}

impl fmt::Display for AlbumLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identity {
            Some(identity) => identity.fmt(f),
            None => write!(f, "{}", self.current_path.display()),
        }
    }
}
