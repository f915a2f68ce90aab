//! Collection audit command.

use crate::config::Config;
use crate::health::{self, AuditFlags};

/// Report albums that are not lossless, and folder names that lie about it
pub fn cmd_fsck(config: &Config, json: bool) -> anyhow::Result<()> {
    let stats = health::find_lossy_albums(&config.paths.root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    for audit in &stats.findings {
        println!(
            "  {} {} ({})",
            audit.flags.summary_icon(),
            audit.path.display(),
            audit.flags.descriptions().join(", ")
        );
        for file in &audit.suspicious {
            println!("      ? {}", file.display());
        }
    }

    println!();
    println!("Album Audit Summary");
    println!("===================");
    println!("Albums checked:     {}", stats.checked);
    println!("  Not lossless:     {}", stats.non_lossless);
    println!("  ✗ Missing marker: {}", stats.unflagged);
    println!("  ✗ False marker:   {}", stats.falsely_flagged);
    let suspicious = stats
        .findings
        .iter()
        .filter(|a| a.flags.contains(AuditFlags::SUSPICIOUS_FILES))
        .count();
    println!("  ! Suspicious:     {}", suspicious);

    if stats.has_mismatches() {
        eprintln!();
        eprintln!("Rename the albums marked ✗ so their name matches their contents.");
    }
    Ok(())
}
