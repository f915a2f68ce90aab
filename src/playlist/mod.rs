//! m3u playlists of imported albums.
//!
//! Every album imported from the incoming directory is added to two
//! playlists in the playlist directory: one for the day (`YYYY-MM-DD.m3u`)
//! and one for the month (`YYYY-MM.m3u`). Playlists list track paths relative
//! to the collection root, one per line, which is what MPD expects.
//!
//! Albums move when the genre tables change, so a playlist is re-resolved
//! before it is written.

use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::{Config, LibraryPaths};
use crate::error::{Error, Result, ResultExt};
use crate::library::{AliasTable, GenreTable, is_single_component};
use crate::model::AlbumLocation;
use crate::scanner::sort::ImportSink;
use crate::scanner::{is_track, list_files};

pub const PLAYLIST_EXTENSION: &str = "m3u";

/// A playlist file and the albums it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub path: PathBuf,
    root: PathBuf,
    /// Album directories relative to the root, in order, without duplicates
    albums: Vec<PathBuf>,
}

impl Playlist {
    /// An empty playlist that will be written to `path`.
    pub fn new(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: root.into(),
            albums: Vec::new(),
        }
    }

    /// Read a playlist; a missing file is an empty playlist.
    pub fn load(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Result<Self> {
        let mut playlist = Self::new(path, root);
        let contents = match fs::read_to_string(&playlist.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(playlist),
            Err(e) => {
                return Err(Error::from(e).context(format!("Failed to read {:?}", playlist.path)));
            }
        };

        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(album) = Path::new(line).parent() {
                playlist.add_album(album);
            }
        }
        tracing::debug!(playlist = %playlist, "Loaded playlist");
        Ok(playlist)
    }

    /// File name of the playlist.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn albums(&self) -> &[PathBuf] {
        &self.albums
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// Append an album directory (relative to the root) unless already listed.
    pub fn add_album(&mut self, album: impl AsRef<Path>) {
        let album = album.as_ref();
        if album.as_os_str().is_empty() || self.albums.iter().any(|a| a == album) {
            return;
        }
        self.albums.push(album.to_path_buf());
    }

    /// Point every entry at where its album belongs now.
    ///
    /// Entries whose directory name is not an album are dropped.
    pub fn update(&mut self, genres: &GenreTable, aliases: &AliasTable, unsorted_subdir: &str) {
        let albums = std::mem::take(&mut self.albums);
        for album in albums {
            let mut location = AlbumLocation::new(&self.root, self.root.join(&album));
            match location.resolve(genres, aliases, unsorted_subdir) {
                Ok(_) => {
                    if let Some(target) = location.relative_target() {
                        let target = target.to_path_buf();
                        self.add_album(target);
                    }
                }
                Err(e) => tracing::warn!(playlist = %self.name(), "Dropping {:?}: {}", album, e),
            }
        }
    }

    /// Drop entries whose album directory no longer exists, returning them.
    pub fn drop_missing(&mut self) -> Vec<PathBuf> {
        let (kept, missing): (Vec<PathBuf>, Vec<PathBuf>) = std::mem::take(&mut self.albums)
            .into_iter()
            .partition(|album| self.root.join(album).is_dir());
        for album in &missing {
            tracing::warn!(playlist = %self.name(), "Dropping missing album {:?}", album);
        }
        self.albums = kept;
        missing
    }

    /// Write the tracks of every album, replacing the file.
    ///
    /// Fails without touching the file if the playlist is empty or an album
    /// directory is missing.
    pub fn write(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::playlist(format!("{} is empty, nothing to write", self.name())));
        }

        let mut contents = String::new();
        for album in &self.albums {
            let dir = self.root.join(album);
            let files = match list_files(&dir) {
                Ok(files) => files,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(Error::playlist(format!(
                        "Could not find {}; have you synced lately?",
                        album.display()
                    )));
                }
                Err(e) => return Err(Error::from(e).context(format!("Failed to list {:?}", dir))),
            };
            for track in files.iter().filter(|f| is_track(f)) {
                let relative = track.strip_prefix(&self.root).unwrap_or(track);
                contents.push_str(&relative.to_string_lossy());
                contents.push('\n');
            }
        }

        // Write atomically (write to temp, then rename)
        let temp_path = self.path.with_extension("m3u.tmp");
        fs::write(&temp_path, &contents)
            .with_context(format!("Failed to write {:?}", temp_path))?;
        fs::rename(&temp_path, &self.path)
            .with_context(format!("Failed to rename {:?}", temp_path))?;

        tracing::info!(playlist = %self, "Wrote playlist");
        Ok(())
    }
}

impl ImportSink for Playlist {
    fn add_import(&mut self, location: &AlbumLocation) {
        let album = location
            .relative_target()
            .unwrap_or_else(|| location.relative_current())
            .to_path_buf();
        self.add_album(album);
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} albums", self.name(), self.albums.len())
    }
}

// ============================================================================
// Current playlists
// ============================================================================

/// The daily and monthly playlists new imports go to.
#[derive(Debug, Clone)]
pub struct CurrentPlaylists {
    pub daily: Playlist,
    pub monthly: Playlist,
}

impl CurrentPlaylists {
    /// Open (and re-resolve) the playlists for `today`.
    pub fn load(
        paths: &LibraryPaths,
        genres: &GenreTable,
        aliases: &AliasTable,
        today: NaiveDate,
    ) -> Result<Self> {
        let dir = &paths.playlist_directory;
        let daily_name = format!("{}.{PLAYLIST_EXTENSION}", today.format("%Y-%m-%d"));
        let monthly_name = format!("{}.{PLAYLIST_EXTENSION}", today.format("%Y-%m"));

        let mut daily = Playlist::load(dir.join(daily_name), &paths.root)?;
        let mut monthly = Playlist::load(dir.join(monthly_name), &paths.root)?;
        daily.update(genres, aliases, &paths.unsorted_subdir);
        monthly.update(genres, aliases, &paths.unsorted_subdir);

        Ok(Self { daily, monthly })
    }

    /// Write the playlists that have albums, after dropping albums that
    /// disappeared from the collection.
    ///
    /// Both playlists are attempted even if one fails. Returns how many were
    /// written along with the failures.
    pub fn write(&mut self) -> (usize, Vec<Error>) {
        let mut written = 0;
        let mut errors = Vec::new();
        for playlist in [&mut self.daily, &mut self.monthly] {
            playlist.drop_missing();
            if playlist.is_empty() {
                continue;
            }
            match playlist.write() {
                Ok(()) => written += 1,
                Err(e) => {
                    tracing::warn!(playlist = %playlist.name(), "Could not write playlist: {}", e);
                    errors.push(e);
                }
            }
        }
        (written, errors)
    }
}

impl ImportSink for CurrentPlaylists {
    fn add_import(&mut self, location: &AlbumLocation) {
        self.daily.add_import(location);
        self.monthly.add_import(location);
    }
}

// ============================================================================
// Playlist directory
// ============================================================================

/// Names of the playlists in `dir`, sorted.
pub fn list_playlists(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(format!("Failed to read {:?}", dir))? {
        let path = entry?.path();
        if path.is_file() && has_playlist_extension(&path) {
            if let Some(name) = path.file_name() {
                names.push(name.to_string_lossy().into_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Re-resolve an existing playlist and write it back.
pub fn update_playlist(name: &str, config: &Config) -> Result<Playlist> {
    if !is_single_component(name) {
        return Err(Error::playlist(format!(
            "{name} is not a file name in the playlist directory"
        )));
    }
    let path = config.paths.playlist_directory.join(name);
    if !has_playlist_extension(&path) {
        return Err(Error::playlist(format!("{name} is not an m3u playlist")));
    }
    if !path.is_file() {
        return Err(Error::not_found(path));
    }

    let mut playlist = Playlist::load(&path, &config.paths.root)?;
    playlist.update(&config.genres, &config.aliases, &config.paths.unsorted_subdir);
    playlist.write()?;
    Ok(playlist)
}

fn has_playlist_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PLAYLIST_EXTENSION)
}
