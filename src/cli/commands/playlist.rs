//! Playlist commands.

use crate::config::Config;
use crate::playlist::{self, Playlist};

/// List playlists with their album counts
pub fn cmd_playlist_show(config: &Config) -> anyhow::Result<()> {
    let dir = &config.paths.playlist_directory;
    let names = playlist::list_playlists(dir)?;

    println!("Playlists in {}:", dir.display());
    if names.is_empty() {
        println!("  (none)");
    }
    for name in names {
        let playlist = Playlist::load(dir.join(&name), &config.paths.root)?;
        println!("  {}", playlist);
    }
    Ok(())
}

/// Re-resolve the albums of a playlist and rewrite it
pub fn cmd_playlist_update(config: &Config, name: &str) -> anyhow::Result<()> {
    let playlist = playlist::update_playlist(name, config)?;
    println!("✓ Updated {}", playlist);
    Ok(())
}
