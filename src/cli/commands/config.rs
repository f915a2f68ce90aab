//! Configuration commands.

use crate::config::Config;

/// Print the loaded configuration
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    println!("Config directory: {}", config.dir.display());
    print!("{}", config);
    Ok(())
}

/// Rewrite the genre and alias files, normalized
pub fn cmd_config_save(config: &Config) -> anyhow::Result<()> {
    config.save()?;
    println!(
        "✓ Saved {} genres and {} aliases to {}",
        config.genres.len(),
        config.aliases.len(),
        config.dir.display()
    );
    Ok(())
}
