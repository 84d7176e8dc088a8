//! Command-line interface for lyricize.
//!
//! This module provides CLI commands for embedding lyrics into music files,
//! looking up single songs and managing the config file.

mod commands;

pub use commands::{Cli, Commands, run_command};
