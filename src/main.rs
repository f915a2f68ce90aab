//! Music Shelf - keeps a music collection sorted by genre and artist.
//!
//! Album folders named `Artist (Year) Title` are moved to
//! `Root/Genre/MainAlias/`, new imports are collected in daily and monthly
//! playlists, and albums can be audited for non-lossless content.

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod library;
pub mod metadata;
pub mod model;
pub mod organizer;
pub mod playlist;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; stdout is kept for reports
    let directive = if args.verbose {
        "music_shelf=debug"
    } else {
        "music_shelf=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    if !cli::run_command(&args)? {
        cli::Cli::command().print_help()?;
    }
    Ok(())
}
