//! Configuration system using YAML files.
//!
//! Three documents live in the config directory:
//! - `music-shelf.yaml`: collection root, staging subdirectories and the
//!   playlist directory
//! - `genres.yaml`: genre name → artists (and `Various Artists | Title`
//!   compilation entries)
//! - `aliases.yaml`: main alias → alternate artist names
//!
//! The directory defaults to the OS-standard config directory:
//! - Windows: %APPDATA%\music-shelf\
//! - macOS: ~/Library/Application Support/music-shelf/
//! - Linux: ~/.config/music-shelf/
//!
//! Config is loaded once at startup and validated before anything touches the
//! collection. Only `config save` writes it back, normalized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::library::{AliasTable, GenreTable, is_single_component};

pub const APP_NAME: &str = "music-shelf";
pub const PATHS_FILE: &str = "music-shelf.yaml";
pub const GENRES_FILE: &str = "genres.yaml";
pub const ALIASES_FILE: &str = "aliases.yaml";

const PATHS_TEMPLATE: &str = "\
# Absolute path of the music collection
Root:
# Staging directory for new albums, relative to Root
IncomingSubdir: INCOMING
# Where albums of unknown genre go, relative to Root
UnsortedSubdir: UNCATEGORIZED
# Directory holding the m3u playlists
MPDPlaylistDirectory:
";

/// Locations inside and around the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryPaths {
    /// Collection root (absolute once loaded)
    #[serde(default, deserialize_with = "nullable_path")]
    pub root: PathBuf,

    /// Staging directory whose albums count as new
    #[serde(default = "default_incoming_subdir")]
    pub incoming_subdir: String,

    /// Destination for albums matching no genre
    #[serde(default = "default_unsorted_subdir")]
    pub unsorted_subdir: String,

    /// Directory holding daily/monthly playlists
    #[serde(
        rename = "MPDPlaylistDirectory",
        default,
        deserialize_with = "nullable_path"
    )]
    pub playlist_directory: PathBuf,
}

/// An empty value reads as an empty path, reported later as a missing key.
fn nullable_path<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<PathBuf, D::Error> {
    Ok(Option::<PathBuf>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_incoming_subdir() -> String {
    "INCOMING".to_string()
}

fn default_unsorted_subdir() -> String {
    "UNCATEGORIZED".to_string()
}

impl LibraryPaths {
    pub fn new(root: impl Into<PathBuf>, playlist_directory: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            incoming_subdir: default_incoming_subdir(),
            unsorted_subdir: default_unsorted_subdir(),
            playlist_directory: playlist_directory.into(),
        }
    }

    /// Check the required directories exist and make them absolute.
    ///
    /// Subdirectories of the root may be missing; moves create them.
    pub fn check(&mut self) -> Result<(), ConfigError> {
        self.root = existing_dir("Root", &self.root)?;
        self.playlist_directory = existing_dir("MPDPlaylistDirectory", &self.playlist_directory)?;
        check_component("IncomingSubdir", &self.incoming_subdir)?;
        check_component("UnsortedSubdir", &self.unsorted_subdir)?;
        if self.incoming_subdir == self.unsorted_subdir {
            return Err(ConfigError::InvalidName {
                what: "UnsortedSubdir",
                name: self.unsorted_subdir.clone(),
                reason: "must differ from IncomingSubdir",
            });
        }
        Ok(())
    }
}

impl fmt::Display for LibraryPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Paths:")?;
        writeln!(f, "\tRoot: {}", self.root.display())?;
        writeln!(f, "\tIncomingSubdir: {}", self.incoming_subdir)?;
        writeln!(f, "\tUnsortedSubdir: {}", self.unsorted_subdir)?;
        writeln!(f, "\tMPDPlaylistDirectory: {}", self.playlist_directory.display())
    }
}

/// Everything loaded at startup: paths and both tables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the files were loaded from
    pub dir: PathBuf,
    pub paths: LibraryPaths,
    pub genres: GenreTable,
    pub aliases: AliasTable,
}

impl Config {
    /// Load and validate all three documents from `dir`.
    ///
    /// Missing table files are created empty. A missing paths file is
    /// created from a template and reported as [`ConfigError::Created`],
    /// since nothing can run without a root.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;

        let paths_file = dir.join(PATHS_FILE);
        if ensure_file(&paths_file, PATHS_TEMPLATE)? {
            return Err(ConfigError::Created(paths_file));
        }
        let genres_file = dir.join(GENRES_FILE);
        ensure_file(&genres_file, "")?;
        let aliases_file = dir.join(ALIASES_FILE);
        ensure_file(&aliases_file, "")?;

        let mut paths: LibraryPaths = read_yaml(&paths_file)?;
        paths.check()?;
        let genres: GenreTable = read_table(&genres_file)?;
        let aliases: AliasTable = read_table(&aliases_file)?;

        let config = Self {
            dir: dir.to_path_buf(),
            paths,
            genres,
            aliases,
        };
        config.check_tables()?;

        tracing::info!(
            dir = %dir.display(),
            genres = config.genres.len(),
            aliases = config.aliases.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Genre names and main aliases become directory names; they must be
    /// single path components and must not shadow the staging directory.
    fn check_tables(&self) -> Result<(), ConfigError> {
        for genre in self.genres.iter() {
            check_component("genre", &genre.name)?;
            if genre.name == self.paths.incoming_subdir {
                return Err(ConfigError::InvalidName {
                    what: "genre",
                    name: genre.name.clone(),
                    reason: "clashes with IncomingSubdir",
                });
            }
        }
        for entry in self.aliases.iter() {
            check_component("main alias", &entry.main_alias)?;
        }
        Ok(())
    }

    /// Rewrite the genre and alias files, sorted and deduplicated.
    pub fn save(&self) -> Result<(), ConfigError> {
        write_yaml(&self.dir.join(GENRES_FILE), &self.genres)?;
        write_yaml(&self.dir.join(ALIASES_FILE), &self.aliases)?;
        tracing::info!(dir = %self.dir.display(), "Saved config");
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.paths, self.aliases, self.genres)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the default config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Create `path` with `contents` if it does not exist yet.
///
/// Returns whether the file was created.
fn ensure_file(path: &Path, contents: &str) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, contents).map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
    tracing::warn!("Configuration file {:?} created, populate it", path);
    Ok(true)
}

fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let contents =
        fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Tables may be empty files; an empty file is an empty table.
fn read_table<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, ConfigError> {
    let contents =
        fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let contents = serde_yaml::to_string(value).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("yaml.tmp");
    fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;
    Ok(())
}

fn existing_dir(key: &'static str, path: &Path) -> Result<PathBuf, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingKey(key));
    }
    let resolved = fs::canonicalize(path).map_err(|e| ConfigError::MissingPath {
        key,
        path: path.to_path_buf(),
        source: e,
    })?;
    if !resolved.is_dir() {
        return Err(ConfigError::MissingPath {
            key,
            path: path.to_path_buf(),
            source: std::io::Error::other("not a directory"),
        });
    }
    Ok(resolved)
}

fn check_component(what: &'static str, name: &str) -> Result<(), ConfigError> {
    if !is_single_component(name) {
        return Err(ConfigError::InvalidName {
            what,
            name: name.to_string(),
            reason: "must be a single directory name",
        });
    }
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Configuration file {0} created, populate it")]
    Created(PathBuf),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, serde_yaml::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(serde_yaml::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Missing required setting {0}")]
    MissingKey(&'static str),

    #[error("{key} {path} does not exist: {source}")]
    MissingPath {
        key: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid {what} name {name:?}: {reason}")]
    InvalidName {
        what: &'static str,
        name: String,
        reason: &'static str,
    },
}

// ============================================================================
// Tests
// ============================================================================
