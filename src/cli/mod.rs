//! Command-line interface for music-shelf.
//!
//! This module provides CLI commands for sorting the collection, auditing
//! albums, maintaining playlists and inspecting the configuration.

mod commands;

pub use commands::{Cli, Commands, ConfigAction, PlaylistAction, run_command};
