//! CLI command definitions and dispatch.
//!
//! This module provides the command-line interface for Music Shelf.
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `config`: Showing and normalizing the configuration
//! - `sync`: Sorting the collection, playlists and cleanup
//! - `health`: Auditing albums for non-lossless content
//! - `playlist`: Listing and refreshing playlists

mod config;
mod health;
mod playlist;
mod sync;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, ConfigError, config_dir};

pub use config::{cmd_config_save, cmd_config_show};
pub use health::cmd_fsck;
pub use playlist::{cmd_playlist_show, cmd_playlist_update};
pub use sync::cmd_sync;

/// Music Shelf CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding music-shelf.yaml, genres.yaml and aliases.yaml
    #[arg(long, global = true, env = "MUSIC_SHELF_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Show or normalize the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Sort the collection, update playlists and remove empty directories
    Sync {
        /// Dry run - show what would be done without moving anything
        #[arg(long)]
        dry_run: bool,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Same as `sync --dry-run`
    Check {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find albums that are not lossless, and mislabeled ones
    #[command(alias = "audit")]
    Fsck {
        /// Print findings as JSON
        #[arg(long)]
        json: bool,
    },
    /// List or refresh playlists
    Playlist {
        #[command(subcommand)]
        action: PlaylistAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print paths, aliases and genres
    Show,
    /// Rewrite genres.yaml and aliases.yaml sorted and deduplicated
    Save,
}

#[derive(Subcommand)]
pub enum PlaylistAction {
    /// List playlists in the playlist directory
    Show,
    /// Point a playlist at the current location of its albums
    Update {
        /// Playlist file name, e.g. 2024-03.m3u
        name: String,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was
/// specified (meaning help should be shown).
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let Some(command) = &cli.command else {
        return Ok(false);
    };
    let config = load_config(cli)?;

    match command {
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(&config)?,
            ConfigAction::Save => cmd_config_save(&config)?,
        },
        Commands::Sync { dry_run, json } => cmd_sync(&config, *dry_run, *json)?,
        Commands::Check { json } => cmd_sync(&config, true, *json)?,
        Commands::Fsck { json } => cmd_fsck(&config, *json)?,
        Commands::Playlist { action } => match action {
            PlaylistAction::Show => cmd_playlist_show(&config)?,
            PlaylistAction::Update { name } => cmd_playlist_update(&config, name)?,
        },
    }
    Ok(true)
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the configuration from `--config-dir` or the OS config directory.
pub(crate) fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let dir = cli
        .config_dir
        .clone()
        .or_else(config_dir)
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(Config::load(&dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_flags() {
        let cli = Cli::try_parse_from(["music-shelf", "sync", "--dry-run", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Sync {
                dry_run: true,
                json: true
            })
        ));
    }

    #[test]
    fn test_audit_alias() {
        let cli = Cli::try_parse_from(["music-shelf", "audit"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Fsck { json: false })));
    }

    #[test]
    fn test_global_config_dir() {
        let cli = Cli::try_parse_from([
            "music-shelf",
            "playlist",
            "update",
            "2024-03.m3u",
            "--config-dir",
            "/tmp/conf",
        ])
        .unwrap();
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/conf")));
        assert!(matches!(
            cli.command,
            Some(Commands::Playlist {
                action: PlaylistAction::Update { .. }
            })
        ));
    }

    #[test]
    fn test_no_command_runs_nothing() {
        let cli = Cli::try_parse_from(["music-shelf"]).unwrap();
        assert!(!run_command(&cli).unwrap());
    }
}
