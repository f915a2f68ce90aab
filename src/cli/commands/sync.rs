//! Collection sorting command.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::organizer::delete_empty_folders;
use crate::playlist::CurrentPlaylists;
use crate::scanner::{SortStats, sort_albums};

#[derive(Serialize)]
struct SyncReport {
    dry_run: bool,
    #[serde(flatten)]
    stats: SortStats,
    playlists_written: usize,
    playlist_errors: Vec<String>,
    empty_directories_removed: usize,
}

/// Sort the collection, then write playlists and remove empty directories
pub fn cmd_sync(config: &Config, dry_run: bool, json: bool) -> anyhow::Result<()> {
    if !json {
        println!("Sorting {}...", config.paths.root.display());
        if dry_run {
            println!("\n[DRY RUN MODE - No albums will be moved]\n");
        }
    }

    let today = Local::now().date_naive();
    let (report, playlists) = run_sync(config, dry_run, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &playlists);
    }
    Ok(())
}

/// One sync pass. Playlist failures are reported, not returned, so cleanup
/// still runs once albums have moved.
fn run_sync(
    config: &Config,
    dry_run: bool,
    today: NaiveDate,
) -> anyhow::Result<(SyncReport, CurrentPlaylists)> {
    let paths = &config.paths;
    let mut playlists = CurrentPlaylists::load(paths, &config.genres, &config.aliases, today)?;
    let stats = sort_albums(paths, &config.genres, &config.aliases, dry_run, &mut playlists)?;

    let mut report = SyncReport {
        dry_run,
        stats,
        playlists_written: 0,
        playlist_errors: Vec::new(),
        empty_directories_removed: 0,
    };
    if !dry_run {
        let (written, errors) = playlists.write();
        report.playlists_written = written;
        report.playlist_errors = errors.iter().map(|e| e.to_string()).collect();
        report.empty_directories_removed = delete_empty_folders(&paths.root)?;
    }
    Ok((report, playlists))
}

fn print_report(report: &SyncReport, playlists: &CurrentPlaylists) {
    let stats = &report.stats;

    for failure in &stats.failures {
        let to = failure
            .to
            .as_deref()
            .map_or_else(|| "?".to_string(), |p| p.display().to_string());
        eprintln!("✗ {} -> {}: {}", failure.from.display(), to, failure.error);
    }

    println!();
    println!("Albums found:   {}", stats.found);
    println!("  lossy:        {}", stats.lossy);
    println!("  new:          {}", stats.new);
    if report.dry_run {
        println!("Would move:     {}", stats.moved);
    } else {
        println!("✓ Moved:        {}", stats.moved);
    }
    if stats.failed > 0 {
        println!("✗ Failed:       {}", stats.failed);
    }
    if !report.dry_run {
        if report.playlists_written > 0 {
            println!("✓ Playlists:    {}, {}", playlists.daily, playlists.monthly);
        }
        for error in &report.playlist_errors {
            println!("✗ Playlist:     {}", error);
        }
        println!("Empty directories removed: {}", report.empty_directories_removed);
    }

    if stats.has_uncategorized() {
        eprintln!();
        eprintln!("!!! {} albums are UNCATEGORIZED !!!", stats.uncategorized);
        eprintln!("!!! Add their artists to genres.yaml and sync again !!!");
    }
}
