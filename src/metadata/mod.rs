//! Album metadata extraction from folder names.
//!
//! Album folders are named `Artist (Year) Title`, optionally followed by the
//! lossy marker ` [MP3]` for albums that only exist in a lossy encoding.
//! Everything this tool knows about an album comes from that name; audio
//! files are never opened.
//!
//! # Canonical marker
//!
//! The marker is exactly one space followed by `[MP3]` at the very end of the
//! name. `Title[MP3]` (no space) is not a marker: the brackets stay part of
//! the title.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::library::is_single_component;
use crate::model::AlbumIdentity;

/// Suffix flagging a lossy album.
pub const LOSSY_MARKER: &str = " [MP3]";

/// Artist is greedy, title is lazy so the marker lands in its own group.
static ALBUM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) \(([0-9]{4})\) (.+?)( \[MP3\])?$").expect("album pattern is valid")
});

/// Parse a folder base name into an [`AlbumIdentity`].
///
/// Fails with [`Error::NotAnAlbum`] when the name has no parenthesized
/// four-digit year, when the artist or title would be blank, or when the
/// artist cannot be used as a single directory name (`..`, separators).
pub fn parse_folder_name(base_name: &str) -> Result<AlbumIdentity> {
    let captures = ALBUM_PATTERN
        .captures(base_name)
        .ok_or_else(|| Error::not_an_album(base_name))?;

    let artist = &captures[1];
    let title = &captures[3];
    if !is_single_component(artist) || title.trim().is_empty() {
        return Err(Error::not_an_album(base_name));
    }

    Ok(AlbumIdentity {
        artist: artist.to_string(),
        main_alias: artist.to_string(),
        year: captures[2].to_string(),
        title: title.to_string(),
        is_lossy: captures.get(4).is_some(),
    })
}
