//! Genres and the artists that belong to them.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{compare_keys, contains_name, normalize_names};

/// Main alias used for various-artists compilations.
pub const VARIOUS_ARTISTS: &str = "Various Artists";

/// How a compilation is listed in a genre: `Various Artists | <title>`.
pub fn compilation_entry(title: &str) -> String {
    format!("{VARIOUS_ARTISTS} | {title}")
}

/// A genre and its artists, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub name: String,
    artists: Vec<String>,
}

impl Genre {
    pub fn new(name: impl Into<String>, artists: Vec<String>) -> Self {
        Self {
            name: name.into(),
            artists: normalize_names(artists),
        }
    }

    /// Artists and compilation entries, in sorted order.
    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    /// Whether the genre lists this artist or main alias.
    pub fn has_artist(&self, artist: &str) -> bool {
        contains_name(&self.artists, artist)
    }

    /// Whether the genre lists the various-artists compilation with this title.
    pub fn has_compilation(&self, title: &str) -> bool {
        contains_name(&self.artists, &compilation_entry(title))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        for artist in &self.artists {
            writeln!(f, "\t\t- {}", artist)?;
        }
        Ok(())
    }
}

/// All known genres, ordered case-insensitively by name.
///
/// The order is also the resolution order: an artist listed in two genres
/// goes to the one that sorts first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreTable {
    genres: Vec<Genre>,
}

impl GenreTable {
    pub fn new(mut genres: Vec<Genre>) -> Self {
        genres.sort_by(|a, b| compare_keys(&a.name, &b.name));
        Self { genres }
    }

    /// Build from a YAML-shaped map; a genre with no artists may be `null`.
    pub fn from_map(map: HashMap<String, Option<Vec<String>>>) -> Self {
        Self::new(
            map.into_iter()
                .map(|(name, artists)| Genre::new(name, artists.unwrap_or_default()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genre> {
        self.genres.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Genre> {
        self.genres.iter().find(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

impl Serialize for GenreTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.genres.iter().map(|g| (&g.name, &g.artists)))
    }
}

impl<'de> Deserialize<'de> for GenreTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Option::<HashMap<String, Option<Vec<String>>>>::deserialize(deserializer)?;
        Ok(Self::from_map(map.unwrap_or_default()))
    }
}

impl fmt::Display for GenreTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "All Genres:")?;
        for genre in &self.genres {
            write!(f, "\t{}", genre)?;
        }
        Ok(())
    }
}
