//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`LyricsError`], [`ConfigError`]) for
//!   detailed handling; tag errors stay per-track and never reach here
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use lyricize::error::{Result, ResultExt};
//!
//! fn list_tracks(dir: &Path) -> Result<Vec<TrackFile>> {
//!     let entries = std::fs::read_dir(dir).with_context("listing music folder")?;
//!     ...
//! }
//! ```

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::lyrics::LyricsError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Lyrics lookup error
    #[error("Lyrics error: {0}")]
    Lyrics(#[from] LyricsError),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Directory missing or without audio files
    #[error("Directory is empty or does not exist: {}", .0.display())]
    EmptyDirectory(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an empty directory error.
    pub fn empty_directory(path: impl Into<PathBuf>) -> Self {
        Self::EmptyDirectory(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricsSource;

    #[test]
    fn test_lyrics_error_converts() {
        let err: Error = LyricsError::Blocked {
            provider: LyricsSource::Genius,
            reason: "challenge".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Lyrics(LyricsError::Blocked { .. })));
        assert!(err.to_string().contains("Genius"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::empty_directory("/music/empty");
        assert!(err.to_string().contains("/music/empty"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::Lyrics(LyricsError::Cancelled).context("while processing track 3");
        let msg = err.to_string();
        assert!(msg.contains("while processing track 3"));
        assert!(msg.contains("cancelled"));
    }

    #[test]
    fn test_result_ext_io() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let with_ctx = result.with_context("reading music folder");
        assert!(with_ctx.unwrap_err().to_string().contains("reading music folder"));
    }
}
