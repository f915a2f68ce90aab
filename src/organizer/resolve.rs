//! Destination resolution against the genre and alias tables.

use std::path::PathBuf;

use crate::error::Result;
use crate::library::{AliasTable, GenreTable, VARIOUS_ARTISTS};
use crate::model::{AlbumIdentity, AlbumLocation};

/// Where an album belongs, relative to the collection root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// `Genre/MainAlias/FolderName` or `Unsorted/MainAlias/FolderName`
    pub relative_path: PathBuf,
    /// Canonical artist name after alias lookup
    pub main_alias: String,
    /// Whether some genre claimed the album
    pub has_known_genre: bool,
}

/// Resolve an album's destination. Never touches the filesystem.
///
/// The artist is first mapped to its main alias (first table entry listing
/// it). Genres are then tried in table order; compilations by
/// `Various Artists` match on their `Various Artists | Title` entry.
pub fn resolve(
    identity: &AlbumIdentity,
    genres: &GenreTable,
    aliases: &AliasTable,
    unsorted_subdir: &str,
) -> Resolution {
    let main_alias = aliases
        .main_alias_for(&identity.artist)
        .unwrap_or(&identity.artist)
        .to_string();

    let genre = genres.iter().find(|genre| {
        if main_alias == VARIOUS_ARTISTS {
            genre.has_compilation(&identity.title)
        } else {
            genre.has_artist(&main_alias)
        }
    });

    let top = genre.map_or(unsorted_subdir, |g| g.name.as_str());
    let relative_path = [top, main_alias.as_str(), identity.folder_name().as_str()]
        .iter()
        .collect();

    Resolution {
        relative_path,
        has_known_genre: genre.is_some(),
        main_alias,
    }
}

impl AlbumLocation {
    /// Resolve this album, filling in its main alias and target path.
    ///
    /// Returns whether the album has a known genre.
    pub fn resolve(
        &mut self,
        genres: &GenreTable,
        aliases: &AliasTable,
        unsorted_subdir: &str,
    ) -> Result<bool> {
        let resolution = resolve(self.identify()?, genres, aliases, unsorted_subdir);

        if let Some(identity) = self.identity.as_mut() {
            identity.main_alias = resolution.main_alias;
        }
        self.target_path = Some(self.root.join(&resolution.relative_path));
        Ok(resolution.has_known_genre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::metadata::parse_folder_name;
    use crate::test_utils::{sample_aliases, sample_genres, strings};
    use crate::library::{ArtistAliases, Genre};
    use std::path::Path;

    #[test]
    fn test_known_genre() {
        let identity = parse_folder_name("arthi (2000) jqojdoijd").unwrap();
        let resolution = resolve(&identity, &sample_genres(), &AliasTable::default(), "UNCATEGORIZED");

        assert_eq!(
            resolution.relative_path,
            Path::new("genre1/arthi/arthi (2000) jqojdoijd")
        );
        assert_eq!(resolution.main_alias, "arthi");
        assert!(resolution.has_known_genre);
    }

    #[test]
    fn test_unknown_genre_goes_to_unsorted() {
        let identity = parse_folder_name("arthi (2000) jqojdoijd").unwrap();
        let resolution = resolve(
            &identity,
            &GenreTable::default(),
            &AliasTable::default(),
            "UNCATEGORIZED",
        );

        assert_eq!(
            resolution.relative_path,
            Path::new("UNCATEGORIZED/arthi/arthi (2000) jqojdoijd")
        );
        assert!(!resolution.has_known_genre);
    }

    #[test]
    fn test_alias_picks_main_alias_and_genre() {
        let identity = parse_folder_name("arthi東京?-4. (2000) jqojdoijd(??)--+").unwrap();
        let resolution = resolve(&identity, &sample_genres(), &sample_aliases(), "UNCATEGORIZED");

        assert_eq!(
            resolution.relative_path,
            Path::new("genre1/PPP/arthi東京?-4. (2000) jqojdoijd(??)--+")
        );
        assert_eq!(resolution.main_alias, "PPP");
        assert!(resolution.has_known_genre);
    }

    #[test]
    fn test_compilation_matches_by_title() {
        let genres = sample_genres();
        let aliases = AliasTable::default();

        let identity = parse_folder_name("Various Artists (1999) Hits").unwrap();
        let resolution = resolve(&identity, &genres, &aliases, "UNCATEGORIZED");
        assert_eq!(
            resolution.relative_path,
            Path::new("compilations/Various Artists/Various Artists (1999) Hits")
        );

        let identity = parse_folder_name("Various Artists (1999) Misses").unwrap();
        let resolution = resolve(&identity, &genres, &aliases, "UNCATEGORIZED");
        assert!(!resolution.has_known_genre);
    }

    #[test]
    fn test_aliased_compilation() {
        let aliases = AliasTable::new(vec![ArtistAliases::new("Various Artists", strings(&["VA"]))]);
        let identity = parse_folder_name("VA (1999) Hits [MP3]").unwrap();
        let resolution = resolve(&identity, &sample_genres(), &aliases, "UNCATEGORIZED");

        assert_eq!(
            resolution.relative_path,
            Path::new("compilations/Various Artists/VA (1999) Hits [MP3]")
        );
    }

    #[test]
    fn test_first_genre_in_table_order_wins() {
        let genres = GenreTable::new(vec![
            Genre::new("rock", strings(&["arthi"])),
            Genre::new("Blues", strings(&["arthi"])),
        ]);
        let identity = parse_folder_name("arthi (2000) x").unwrap();
        let resolution = resolve(&identity, &genres, &AliasTable::default(), "U");
        assert_eq!(resolution.relative_path, Path::new("Blues/arthi/arthi (2000) x"));
    }

    #[test]
    fn test_location_resolve_sets_target() {
        let mut location = AlbumLocation::new("/music", "/music/INCOMING/arthi東京?-4. (2000) t");
        let known = location
            .resolve(&sample_genres(), &sample_aliases(), "UNCATEGORIZED")
            .unwrap();

        assert!(known);
        assert_eq!(location.identity().unwrap().main_alias, "PPP");
        assert_eq!(
            location.target_path.as_deref(),
            Some(Path::new("/music/genre1/PPP/arthi東京?-4. (2000) t"))
        );
        assert_eq!(location.to_string(), "PPP/arthi東京?-4. (2000) t");
    }

    #[test]
    fn test_location_resolve_rejects_non_album() {
        let mut location = AlbumLocation::new("/music", "/music/hop");
        let result = location.resolve(&sample_genres(), &sample_aliases(), "UNCATEGORIZED");
        assert!(matches!(result, Err(Error::NotAnAlbum(_))));
        assert!(location.target_path.is_none());
    }
}

/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::library::Genre;
    use crate::metadata::parse_folder_name;
    use proptest::prelude::*;

    fn artist_name() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Z東京][a-zA-Z0-9東京?. -]{0,12}").unwrap()
    }

    proptest! {
        /// Resolution is a pure function of identity and tables
        #[test]
        fn resolution_is_deterministic(
            artist in artist_name(),
            members in prop::collection::vec(artist_name(), 0..6),
            genre_count in 1usize..4,
        ) {
            let genres: Vec<Genre> = (0..genre_count)
                .map(|i| Genre::new(format!("g{i}"), members.clone()))
                .collect();
            let mut reversed = genres.clone();
            reversed.reverse();

            let identity = parse_folder_name(&format!("{artist} (2000) t")).unwrap();
            let a = resolve(&identity, &GenreTable::new(genres), &AliasTable::default(), "U");
            let b = resolve(&identity, &GenreTable::new(reversed), &AliasTable::default(), "U");
            prop_assert_eq!(a, b);
        }

        /// The destination always ends with the unchanged folder name
        #[test]
        fn destination_keeps_folder_name(artist in artist_name(), lossy in any::<bool>()) {
            let mut name = format!("{artist} (1987) title");
            if lossy {
                name.push_str(crate::metadata::LOSSY_MARKER);
            }
            let identity = parse_folder_name(&name).unwrap();
            let resolution = resolve(&identity, &GenreTable::default(), &AliasTable::default(), "U");

            prop_assert_eq!(resolution.relative_path.file_name().and_then(|n| n.to_str()), Some(name.as_str()));
            prop_assert_eq!(resolution.relative_path.components().count(), 3);
        }
    }
}
