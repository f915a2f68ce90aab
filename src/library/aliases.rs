//! Artist aliases: alternate names that resolve to one main alias.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{compare_keys, contains_name, normalize_names};

/// The main alias of an artist and every other name it goes by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistAliases {
    pub main_alias: String,
    aliases: Vec<String>,
}

impl ArtistAliases {
    pub fn new(main_alias: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            main_alias: main_alias.into(),
            aliases: normalize_names(aliases),
        }
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        contains_name(&self.aliases, alias)
    }
}

impl fmt::Display for ArtistAliases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.main_alias)?;
        for alias in &self.aliases {
            writeln!(f, "\t\t- {}", alias)?;
        }
        Ok(())
    }
}

/// All artists with aliases, ordered case-insensitively by main alias.
///
/// An alternate name listed under two main aliases resolves to the first one
/// in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<ArtistAliases>,
}

impl AliasTable {
    pub fn new(mut entries: Vec<ArtistAliases>) -> Self {
        entries.sort_by(|a, b| compare_keys(&a.main_alias, &b.main_alias));
        Self { entries }
    }

    pub fn from_map(map: HashMap<String, Option<Vec<String>>>) -> Self {
        Self::new(
            map.into_iter()
                .map(|(main, aliases)| ArtistAliases::new(main, aliases.unwrap_or_default()))
                .collect(),
        )
    }

    /// The main alias an artist name resolves to, if any.
    pub fn main_alias_for(&self, artist: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.has_alias(artist))
            .map(|entry| entry.main_alias.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtistAliases> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AliasTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|a| (&a.main_alias, &a.aliases)))
    }
}

impl<'de> Deserialize<'de> for AliasTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Option::<HashMap<String, Option<Vec<String>>>>::deserialize(deserializer)?;
        Ok(Self::from_map(map.unwrap_or_default()))
    }
}

impl fmt::Display for AliasTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "All Aliases:")?;
        for entry in &self.entries {
            write!(f, "\t{}", entry)?;
        }
        Ok(())
    }
}
