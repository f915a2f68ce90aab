//! Application-wide error types.
//!
//! Library modules return [`Error`] via `thiserror`, while CLI/main uses
//! `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - [`Error::is_fatal`]: whether an error must abort a whole run or only the
//!   album being processed
//! - [`ConfigError`](crate::config::ConfigError) for startup configuration
//!   problems
//!
//! # Example
//!
//! ```ignore
//! use music_shelf::error::{Error, Result};
//!
//! fn move_album(location: &AlbumLocation) -> Result<bool> {
//!     match organizer::relocate(location, false) {
//!         Err(e) if !e.is_fatal() => Ok(false), // log and keep walking
//!         other => other,
//!     }
//! }
//! ```

use std::path::PathBuf;

use crate::config::ConfigError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Folder name does not follow `Artist (Year) Title`
    #[error("Not an album: {0}")]
    NotAnAlbum(String),

    /// Relocation requested before the target path was resolved
    #[error("Target not resolved for {0}")]
    TargetNotResolved(PathBuf),

    /// A destination parent directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renaming an album directory failed
    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Something already lives at the destination of a move
    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// Directory traversal failed
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Playlist loading/writing error
    #[error("Playlist error: {0}")]
    Playlist(String),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not-an-album error.
    pub fn not_an_album(name: impl Into<String>) -> Self {
        Self::NotAnAlbum(name.into())
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a playlist error.
    pub fn playlist(message: impl Into<String>) -> Self {
        Self::Playlist(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error must abort the whole run.
    ///
    /// Failed renames and occupied destinations only affect one album; the
    /// tree walk reports them and carries on. Everything that leaves the
    /// collection in an unknown state (missing parent directories, an
    /// unreadable root, a relocation without a resolved target, broken
    /// configuration) stops the run.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::NotAnAlbum(_) | Error::Move { .. } | Error::DestinationExists(_) => false,
            Error::WithContext { source, .. } => source.is_fatal(),
            _ => true,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
