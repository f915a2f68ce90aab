//! Album organization: where an album belongs and getting it there.
//!
//! Albums are laid out as `Root/Genre/MainAlias/Artist (Year) Title`, or under
//! the unsorted subdirectory when no genre claims the artist.
//!
//! # Features
//! - Pure resolution of an album's destination from the genre and alias tables
//! - Idempotent directory moves with a dry-run mode
//! - Removal of directories left empty by moves

mod cleanup;
mod relocate;
mod resolve;

pub use cleanup::delete_empty_folders;
pub use relocate::relocate;
pub use resolve::{Resolution, resolve};
