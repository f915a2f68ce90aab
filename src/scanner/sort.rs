//! Sorting the whole collection in one walk.
//!
//! Every directory whose name parses as an album is resolved and moved to
//! where it belongs. Albums found in the incoming directory are handed to an
//! [`ImportSink`], which in production is the current playlists.

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

use super::{is_vanished, walk_sorted};
use crate::config::LibraryPaths;
use crate::error::{Error, Result};
use crate::library::{AliasTable, GenreTable};
use crate::model::AlbumLocation;
use crate::organizer::relocate;

/// Receives albums imported from the incoming directory.
pub trait ImportSink {
    /// Called once per incoming album, after resolution and a successful (or
    /// already in place) move.
    ///
    /// Albums whose move failed are not reported: they stay in the incoming
    /// directory and are imported by a later sync.
    fn add_import(&mut self, location: &AlbumLocation);
}

/// Collects root-relative destinations.
impl ImportSink for Vec<PathBuf> {
    fn add_import(&mut self, location: &AlbumLocation) {
        let path = location
            .relative_target()
            .unwrap_or_else(|| location.relative_current());
        self.push(path.to_path_buf());
    }
}

/// An album that could not be moved.
#[derive(Debug, Clone, Serialize)]
pub struct SortFailure {
    /// Current path, relative to the root
    pub from: PathBuf,
    /// Intended destination, relative to the root
    pub to: Option<PathBuf>,
    pub error: String,
}

/// Counters for one sorting pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SortStats {
    /// Album directories found
    pub found: usize,
    /// Of which carry the lossy marker
    pub lossy: usize,
    /// Moved (or that would move, in dry run)
    pub moved: usize,
    /// Resolved to the unsorted directory
    pub uncategorized: usize,
    /// Imported from the incoming directory (failed moves excluded)
    pub new: usize,
    /// Could not be moved
    pub failed: usize,
    pub failures: Vec<SortFailure>,
}

impl SortStats {
    /// Whether some albums matched no genre and need attention.
    pub fn has_uncategorized(&self) -> bool {
        self.uncategorized > 0
    }
}

/// Walk the collection once, moving every album to its resolved place.
///
/// Per-album failures are recorded in the returned stats and the walk goes
/// on. Fatal errors (unreadable root, parent directory creation) abort it.
pub fn sort_albums<S: ImportSink + ?Sized>(
    paths: &LibraryPaths,
    genres: &GenreTable,
    aliases: &AliasTable,
    dry_run: bool,
    sink: &mut S,
) -> Result<SortStats> {
    if !paths.root.is_dir() {
        return Err(Error::not_found(&paths.root));
    }

    let mut stats = SortStats::default();
    let mut moved_to: HashSet<PathBuf> = HashSet::new();
    let mut walker = walk_sorted(&paths.root).min_depth(1).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) if is_vanished(&e) => continue,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if moved_to.contains(entry.path()) {
            // Already handled under its old name this pass
            walker.skip_current_dir();
            continue;
        }

        let mut location = AlbumLocation::new(&paths.root, entry.path());
        if !location.is_album() {
            continue;
        }

        stats.found += 1;
        if location.identity().is_some_and(|identity| identity.is_lossy) {
            stats.lossy += 1;
        }
        if !location.resolve(genres, aliases, &paths.unsorted_subdir)? {
            stats.uncategorized += 1;
        }

        match relocate(&location, dry_run) {
            Ok(true) => {
                stats.moved += 1;
                if let Some(target) = &location.target_path {
                    moved_to.insert(target.clone());
                }
                walker.skip_current_dir();
            }
            Ok(false) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    from = %location.relative_current().display(),
                    to = ?location.relative_target(),
                    "Could not move album: {}",
                    e
                );
                stats.failed += 1;
                stats.failures.push(SortFailure {
                    from: location.relative_current().to_path_buf(),
                    to: location.relative_target().map(|p| p.to_path_buf()),
                    error: e.to_string(),
                });
                continue;
            }
        }

        if location.is_new(&paths.incoming_subdir) {
            stats.new += 1;
            sink.add_import(&location);
        }
    }

    tracing::info!(
        found = stats.found,
        moved = stats.moved,
        uncategorized = stats.uncategorized,
        failed = stats.failed,
        dry_run,
        "Sorted collection"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{ArtistAliases, Genre};
    use crate::test_utils::{sample_aliases, sample_genres, strings, temp_library};
    use std::fs;
    use std::path::Path;

    #[test]
    fn test_sorts_incoming_albums() {
        let library = temp_library();
        library.add_album("INCOMING/arthi (2000) jqojdoijd", &["01.flac"]);
        library.add_album("INCOMING/arthi東京?-4. (2000) jqojdoijd(??)--+ [MP3]", &["01.mp3"]);
        library.add_album("INCOMING/nobody (1999) nothing", &["01.flac"]);

        let mut imported: Vec<PathBuf> = Vec::new();
        let stats = sort_albums(
            &library.paths,
            &sample_genres(),
            &sample_aliases(),
            false,
            &mut imported,
        )
        .unwrap();

        assert_eq!(stats.found, 3);
        assert_eq!(stats.lossy, 1);
        assert_eq!(stats.moved, 3);
        assert_eq!(stats.uncategorized, 1);
        assert_eq!(stats.new, 3);
        assert_eq!(stats.failed, 0);
        assert!(stats.has_uncategorized());

        let root = library.root();
        assert!(root.join("genre1/arthi/arthi (2000) jqojdoijd/01.flac").exists());
        assert!(
            root.join("genre1/PPP/arthi東京?-4. (2000) jqojdoijd(??)--+ [MP3]/01.mp3")
                .exists()
        );
        assert!(root.join("UNCATEGORIZED/nobody/nobody (1999) nothing/01.flac").exists());

        assert_eq!(
            imported,
            vec![
                PathBuf::from("genre1/arthi/arthi (2000) jqojdoijd"),
                PathBuf::from("genre1/PPP/arthi東京?-4. (2000) jqojdoijd(??)--+ [MP3]"),
                PathBuf::from("UNCATEGORIZED/nobody/nobody (1999) nothing"),
            ]
        );
    }

    #[test]
    fn test_non_albums_are_skipped_silently() {
        let library = temp_library();
        library.add_album("hop", &["notes.txt"]);
        library.add_album("music/more", &[]);

        let mut imported: Vec<PathBuf> = Vec::new();
        let stats = sort_albums(
            &library.paths,
            &sample_genres(),
            &sample_aliases(),
            false,
            &mut imported,
        )
        .unwrap();

        assert_eq!(stats.found, 0);
        assert_eq!(stats.moved, 0);
        assert!(imported.is_empty());
        assert!(library.root().join("hop/notes.txt").exists());
    }

    #[test]
    fn test_second_pass_moves_nothing() {
        let library = temp_library();
        library.add_album("INCOMING/arthi (2000) jqojdoijd", &["01.flac"]);
        library.add_album("arthi (2001) elsewhere", &["01.flac"]);

        let mut imported: Vec<PathBuf> = Vec::new();
        let first = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), false, &mut imported)
            .unwrap();
        assert_eq!(first.moved, 2);
        assert_eq!(first.new, 1);

        let mut imported: Vec<PathBuf> = Vec::new();
        let second = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), false, &mut imported)
            .unwrap();
        assert_eq!(second.found, 2);
        assert_eq!(second.moved, 0);
        assert_eq!(second.new, 0);
    }

    #[test]
    fn test_dry_run_matches_real_run() {
        let library = temp_library();
        library.add_album("INCOMING/arthi (2000) jqojdoijd", &["01.flac"]);
        library.add_album("INCOMING/nobody (1999) nothing", &["01.flac"]);
        library.add_album("genre1/arthi/arthi (2000) jqojdoijd", &["dup.flac"]);

        let mut dry: Vec<PathBuf> = Vec::new();
        let planned = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), true, &mut dry)
            .unwrap();
        assert!(library.root().join("INCOMING/nobody (1999) nothing").exists());
        assert!(!library.root().join("UNCATEGORIZED").exists());

        let mut real: Vec<PathBuf> = Vec::new();
        let done = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), false, &mut real)
            .unwrap();

        assert_eq!(planned.moved, done.moved);
        assert_eq!(planned.failed, done.failed);
        assert_eq!(planned.new, done.new);
        assert_eq!(dry, real);
    }

    #[test]
    fn test_existing_destination_is_counted_and_skipped() {
        let library = temp_library();
        library.add_album("INCOMING/arthi (2000) jqojdoijd", &["01.flac"]);
        library.add_album("genre1/arthi/arthi (2000) jqojdoijd", &["old.flac"]);

        let mut imported: Vec<PathBuf> = Vec::new();
        let stats = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), false, &mut imported)
            .unwrap();

        assert_eq!(stats.found, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.failures[0].from, Path::new("INCOMING/arthi (2000) jqojdoijd"));
        assert_eq!(
            stats.failures[0].to.as_deref(),
            Some(Path::new("genre1/arthi/arthi (2000) jqojdoijd"))
        );
        assert!(imported.is_empty());
        assert!(library.root().join("INCOMING/arthi (2000) jqojdoijd/01.flac").exists());
    }

    #[test]
    fn test_moved_album_is_not_counted_twice() {
        let library = temp_library();
        // The destination tree sorts after INCOMING, so the walk reaches the
        // moved album again
        library.add_album("INCOMING/nobody (1999) nothing", &["01.flac"]);
        fs::create_dir_all(library.root().join("UNCATEGORIZED")).unwrap();

        let mut imported: Vec<PathBuf> = Vec::new();
        let stats = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), false, &mut imported)
            .unwrap();

        assert_eq!(stats.found, 1);
        assert_eq!(stats.moved, 1);
        assert_eq!(stats.uncategorized, 1);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let mut library = temp_library();
        library.paths.root = library.root().join("gone");

        let mut imported: Vec<PathBuf> = Vec::new();
        let err = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), false, &mut imported)
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_blocked_destination_parent_aborts_the_walk() {
        let library = temp_library();
        library.add_album("INCOMING/arthi (2000) jqojdoijd", &["01.flac"]);
        library.add_album("INCOMING/nobody (1999) nothing", &["01.flac"]);
        fs::write(library.root().join("genre1"), b"not a directory").unwrap();

        let mut imported: Vec<PathBuf> = Vec::new();
        let err = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), false, &mut imported)
            .unwrap_err();

        assert!(matches!(err, Error::CreateDir { .. }));
        assert!(err.is_fatal());
        assert!(imported.is_empty());
        // The walk stopped before reaching the next album
        assert!(library.root().join("INCOMING/nobody (1999) nothing").exists());
        assert!(!library.root().join("UNCATEGORIZED").exists());
    }

    #[test]
    fn test_walk_continues_after_failed_rename() {
        let library = temp_library();
        // The main alias is named like the album, so the destination lies
        // inside the album itself and the rename fails
        let aliases = AliasTable::new(vec![ArtistAliases::new(
            "arthi (2000) jqojdoijd",
            strings(&["arthi"]),
        )]);
        let genres = GenreTable::new(vec![Genre::new("genre1", strings(&["arthi (2000) jqojdoijd"]))]);
        library.add_album("genre1/arthi (2000) jqojdoijd", &["01.flac"]);
        library.add_album("zed (2001) later", &["01.flac"]);

        let mut imported: Vec<PathBuf> = Vec::new();
        let stats = sort_albums(&library.paths, &genres, &aliases, false, &mut imported).unwrap();

        assert_eq!(stats.found, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.moved, 1);
        assert_eq!(stats.failures[0].from, Path::new("genre1/arthi (2000) jqojdoijd"));
        assert!(library.root().join("genre1/arthi (2000) jqojdoijd/01.flac").exists());
        assert!(library.root().join("UNCATEGORIZED/zed/zed (2001) later/01.flac").exists());
    }

    #[test]
    fn test_dot_artist_is_not_an_album() {
        let library = temp_library();
        library.add_album("INCOMING/.. (2000) x", &["01.flac"]);

        let mut imported: Vec<PathBuf> = Vec::new();
        let stats = sort_albums(&library.paths, &sample_genres(), &sample_aliases(), false, &mut imported)
            .unwrap();

        assert_eq!(stats.found, 0);
        assert_eq!(stats.moved, 0);
        assert!(library.root().join("INCOMING/.. (2000) x/01.flac").exists());
        assert!(!library.root().join(".. (2000) x").exists());
    }

    #[test]
    fn test_stats_serialize() {
        let stats = SortStats {
            found: 2,
            moved: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["found"], 2);
        assert_eq!(json["moved"], 1);
        assert_eq!(json["failures"].as_array().unwrap().len(), 0);
    }
}
