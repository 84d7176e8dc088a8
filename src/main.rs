//! Lyricize - embeds song lyrics into the tags of local music files.
//!
//! Reads artist and title from each file, looks the song up on Lyricsify
//! (synced, opt-in) and Genius (plain), and writes what it finds back into
//! the file's lyrics tag.

pub mod cli;
pub mod config;
pub mod error;
pub mod lyrics;
pub mod metadata;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; RUST_LOG replaces the default filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lyricize=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run_command(&args)
}
