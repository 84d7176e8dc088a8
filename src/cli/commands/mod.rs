//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `lyrics`: Batch lyrics runs and single lookups
//! - `setup`: Config file creation and checks
//! - `report`: Per-track report lines

mod lyrics;
mod report;
mod setup;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::error::{Error, Result, ResultExt};
use crate::lyrics::TrackFile;

pub use lyrics::{cmd_run, cmd_search};
pub use setup::{cmd_check, cmd_init_config};

/// Lyricize CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Find and embed lyrics for every file in a directory
    Run(RunArgs),
    /// Look up lyrics for one song without touching any file
    Search {
        /// Artist name
        artist: String,
        /// Song title
        title: String,
        #[command(flatten)]
        providers: ProviderArgs,
    },
    /// Show the effective configuration
    Check,
    /// Write a default config file
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Options of a batch run
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory to process (or set STATIC_WORKING_DIR)
    #[arg(env = "STATIC_WORKING_DIR")]
    pub dir: Option<PathBuf>,
    /// Overwrite lyrics that are already in a file
    #[arg(long)]
    pub overwrite: bool,
    /// When overwriting, accept unsynced lyrics as replacements
    #[arg(long)]
    pub even_if_unsynced: bool,
    /// Accept hits whose artist/title differ from the tags
    #[arg(long)]
    pub allow_inexact: bool,
    /// Resolve and report without writing anything
    #[arg(long)]
    pub dry_run: bool,
    #[command(flatten)]
    pub providers: ProviderArgs,
}

/// Options shared by every command that talks to a provider
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// Search Lyricsify for synced lyrics first
    #[arg(long)]
    pub synced: bool,
    /// Genius API access token (or set GENIUS_ACCESS_TOKEN)
    #[arg(long)]
    pub token: Option<String>,
    /// User agent sent with every request (or set HEADER)
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl ProviderArgs {
    /// Layer these flags over `config`.
    pub fn apply(&self, config: &mut Config) {
        if self.synced {
            config.policy.synced_source_enabled = true;
        }
        if let Some(token) = &self.token {
            config.credentials.genius_access_token = Some(token.clone());
        }
        if let Some(agent) = &self.user_agent {
            config.http.user_agent = agent.clone();
        }
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    // Tracks are processed one at a time; a single thread is enough
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match &cli.command {
        Commands::Run(args) => {
            let config = load_config(cli.config.as_deref())?;
            cmd_run(&rt, config, args)
        }
        Commands::Search {
            artist,
            title,
            providers,
        } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_search(&rt, config, providers, artist, title)
        }
        Commands::Check => cmd_check(cli.config.as_deref()),
        Commands::InitConfig { force } => cmd_init_config(cli.config.as_deref(), *force),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Config from `path` (which must exist) or the default location, with
/// environment overrides applied.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    Ok(config.with_env_overrides())
}

/// Every regular file under `dir`, ordered by path.
///
/// Unsupported files are kept; the metadata store reports them.
pub(crate) fn collect_tracks(dir: &Path) -> Result<Vec<TrackFile>> {
    if !dir.is_dir() {
        return Err(Error::empty_directory(dir));
    }

    let mut tracks = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry
            .map_err(std::io::Error::from)
            .with_context(format!("walking {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let display_name = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .display()
            .to_string();
        tracks.push(TrackFile::new(entry.path(), display_name));
    }

    if tracks.is_empty() {
        return Err(Error::empty_directory(dir));
    }
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_tracks_sorted_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Album")).unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("a.flac"), b"").unwrap();
        std::fs::write(dir.path().join("Album").join("c.mp3"), b"").unwrap();

        let tracks = collect_tracks(dir.path()).unwrap();
        let names: Vec<_> = tracks.iter().map(|t| t.display_name.clone()).collect();

        let nested = Path::new("Album").join("c.mp3").display().to_string();
        assert_eq!(names, vec![nested, "a.flac".to_string(), "b.mp3".to_string()]);
        assert!(tracks.iter().all(|t| t.path.starts_with(dir.path())));
    }

    #[test]
    fn test_collect_tracks_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_tracks(dir.path()),
            Err(Error::EmptyDirectory(_))
        ));
    }

    #[test]
    fn test_collect_tracks_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_tracks(&dir.path().join("missing")),
            Err(Error::EmptyDirectory(_))
        ));
    }

    #[test]
    fn test_provider_args_override_config() {
        let mut config = Config::default();
        let args = ProviderArgs {
            synced: true,
            token: Some("flag-token".to_string()),
            user_agent: Some("agent/2".to_string()),
        };
        args.apply(&mut config);

        assert!(config.policy.synced_source_enabled);
        assert_eq!(config.genius_token(), Some("flag-token"));
        assert_eq!(config.http.user_agent, "agent/2");
    }

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "lyricize",
            "run",
            "/music",
            "--overwrite",
            "--even-if-unsynced",
            "--allow-inexact",
            "--synced",
            "--dry-run",
            "--token",
            "abc",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.dir, Some(PathBuf::from("/music")));
        assert!(args.overwrite && args.even_if_unsynced && args.allow_inexact && args.dry_run);
        assert!(args.providers.synced);
        assert_eq!(args.providers.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from(["lyricize", "search", "Artist A", "Song B"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Search { ref artist, ref title, .. } if artist == "Artist A" && title == "Song B"
        ));
    }
}
