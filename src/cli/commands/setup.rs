//! Config file commands.

use std::path::{Path, PathBuf};

use crate::config::{self, Config, ConfigError};

use super::load_config;

/// Show where the config lives and what the next run would use
pub fn cmd_check(path: Option<&Path>) -> anyhow::Result<()> {
    let file = path.map(Path::to_path_buf).or_else(config::config_path);
    match &file {
        Some(file) if file.exists() => println!("Config file: {} (found)", file.display()),
        Some(file) => println!("Config file: {} (not found, using defaults)", file.display()),
        None => println!("Config file: no config directory on this system"),
    }

    // An explicit path that doesn't exist falls back to defaults here
    let config = match path.filter(|p| p.exists()) {
        Some(p) => load_config(Some(p))?,
        None => load_config(None)?,
    };

    println!();
    println!("Sources:");
    if config.genius_token().is_some() {
        println!("✓ Genius: access token set");
    } else {
        println!("✗ Genius: no access token (set GENIUS_ACCESS_TOKEN or --token)");
    }
    if config.policy.synced_source_enabled {
        println!("✓ Lyricsify: synced lyrics enabled");
    } else {
        println!("✗ Lyricsify: disabled (set I_WANT_SYNCED_LYRICS=True or --synced)");
    }

    println!();
    println!("Policy:");
    println!("  overwrite:                {}", config.policy.overwrite);
    println!("  allow_unsynced_overwrite: {}", config.policy.allow_unsynced_overwrite);
    println!("  require_exact_match:      {}", config.policy.require_exact_match);

    println!();
    println!("HTTP:");
    println!("  user agent: {}", config.http.user_agent);
    println!("  timeout:    {}s", config.timeout().as_secs());
    println!("  attempts:   {}", config.retry_policy().max_attempts);
    println!("  delay:      {}ms", config.http.request_delay_ms);

    Ok(())
}

/// Write a default config file
pub fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let target = init_target(path)?;
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to replace it)",
            target.display()
        );
    }

    let defaults = Config::default();
    match path {
        Some(path) => config::save_to(&defaults, path)?,
        None => config::save(&defaults)?,
    }
    println!("✓ Wrote default config to {}", target.display());
    Ok(())
}

fn init_target(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => config::config_path().ok_or(ConfigError::NoConfigDir),
    }
}
