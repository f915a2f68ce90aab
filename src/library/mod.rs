//! Genre and alias tables.
//!
//! Both tables are loaded once from YAML, normalized (entries ordered
//! case-insensitively, name lists sorted and deduplicated) and then only read.
//! Membership tests rely on that normalization and use binary search.

mod aliases;
mod genres;

use std::cmp::Ordering;
use std::path::{Component, Path};

pub use aliases::{AliasTable, ArtistAliases};
pub use genres::{Genre, GenreTable, VARIOUS_ARTISTS, compilation_entry};

/// Order table keys case-insensitively, falling back to byte order so the
/// result never depends on load order.
pub(crate) fn compare_keys(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort and deduplicate a list of names, ready for binary search.
pub(crate) fn normalize_names(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.dedup();
    names
}

/// Binary search in a normalized list.
pub(crate) fn contains_name(names: &[String], name: &str) -> bool {
    names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
}

/// Whether `name` can be used as exactly one directory name: not blank, not
/// `.` or `..`, and free of path separators on any platform.
pub(crate) fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    single_normal && !name.trim().is_empty() && !name.contains(['/', '\\'])
}
