//! Batch runner - resolves and writes lyrics for a list of files, in order.
//!
//! One track is fully resolved before the next starts. Every track yields
//! exactly one [`TrackReport`]; a fatal error (anti-bot wall, cancellation)
//! ends the run instead of producing a report for the remaining tracks.

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::domain::{Disposition, LyricsError, Resolution, SkipReason, TrackQuery};
use super::service::LyricsResolver;
use crate::metadata::{MetadataError, MetadataStore};

/// A file to process and the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFile {
    pub path: PathBuf,
    pub display_name: String,
}

impl TrackFile {
    pub fn new(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
        }
    }
}

/// What happened to one track.
#[derive(Debug, Clone)]
pub enum TrackOutcome {
    /// The resolver answered; `written` is false for dry runs and non-writes
    Resolved { resolution: Resolution, written: bool },
    /// The file's tags could not be read
    MetadataFailed(MetadataError),
    /// Lyrics were found but saving them failed
    WriteFailed {
        resolution: Resolution,
        error: MetadataError,
    },
}

/// Per-track progress handed to the caller.
#[derive(Debug)]
pub struct TrackReport<'a> {
    /// 1-based position in the run
    pub position: usize,
    pub total: usize,
    pub file: &'a TrackFile,
    pub outcome: TrackOutcome,
}

/// Tally of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Success or inexact resolutions that were written or, on a dry run,
    /// would have been
    pub found: usize,
    pub written: usize,
    pub instrumental: usize,
    pub skipped: usize,
    pub not_found: usize,
    /// Unreadable files and failed writes
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &TrackOutcome) {
        match outcome {
            TrackOutcome::Resolved {
                resolution,
                written,
            } => {
                match resolution.disposition {
                    Disposition::Success | Disposition::Inexact => self.found += 1,
                    Disposition::Instrumental => self.instrumental += 1,
                    Disposition::Skip(_) => self.skipped += 1,
                    Disposition::NotFound => self.not_found += 1,
                }
                if *written {
                    self.written += 1;
                }
            }
            TrackOutcome::WriteFailed { .. } | TrackOutcome::MetadataFailed(_) => {
                self.failed += 1;
            }
        }
    }

    /// Tracks accounted for.
    pub fn total(&self) -> usize {
        self.found + self.instrumental + self.skipped + self.not_found + self.failed
    }
}

/// Drives the resolver over a list of files
pub struct BatchRunner<'s> {
    resolver: LyricsResolver,
    store: &'s dyn MetadataStore,
    dry_run: bool,
    /// Pause after each track that went to the network
    request_delay: Duration,
    cancel: CancellationToken,
}

impl<'s> BatchRunner<'s> {
    pub fn new(resolver: LyricsResolver, store: &'s dyn MetadataStore) -> Self {
        Self {
            resolver,
            store,
            dry_run: false,
            request_delay: Duration::ZERO,
            cancel: CancellationToken::new(),
        }
    }

    /// Resolve without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process `files` in order, calling `on_report` once per track.
    ///
    /// Returns the tally, or the fatal error that stopped the run.
    pub async fn run<F>(
        &self,
        files: &[TrackFile],
        mut on_report: F,
    ) -> Result<BatchSummary, LyricsError>
    where
        F: FnMut(&TrackReport<'_>),
    {
        let total = files.len();
        let mut summary = BatchSummary::default();

        for (index, file) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(LyricsError::Cancelled);
            }

            let outcome = self.process(file).await?;
            let went_online = matches!(
                &outcome,
                TrackOutcome::Resolved { resolution, .. } | TrackOutcome::WriteFailed { resolution, .. }
                    if resolution.disposition != Disposition::Skip(SkipReason::AlreadyHasLyrics)
            );

            summary.record(&outcome);
            on_report(&TrackReport {
                position: index + 1,
                total,
                file,
                outcome,
            });

            if went_online && index + 1 < total && !self.request_delay.is_zero() {
                self.pause().await?;
            }
        }

        tracing::info!(
            "Processed {} tracks: {} found, {} written, {} instrumental, {} skipped, {} not found, {} failed",
            total,
            summary.found,
            summary.written,
            summary.instrumental,
            summary.skipped,
            summary.not_found,
            summary.failed
        );
        Ok(summary)
    }

    async fn process(&self, file: &TrackFile) -> Result<TrackOutcome, LyricsError> {
        let tags = match self.store.read_track(&file.path) {
            Ok(tags) => tags,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", file.path.display(), e);
                return Ok(TrackOutcome::MetadataFailed(e));
            }
        };

        let query = TrackQuery::new(&tags.artist, &tags.title);
        let resolution = self
            .resolver
            .resolve(&query, tags.lyrics.as_deref())
            .await?;

        if !resolution.should_write() || self.dry_run {
            return Ok(TrackOutcome::Resolved {
                resolution,
                written: false,
            });
        }

        let lyrics = resolution.lyrics.as_deref().unwrap_or_default();
        match self.store.write_lyrics(&file.path, lyrics) {
            Ok(()) => Ok(TrackOutcome::Resolved {
                resolution,
                written: true,
            }),
            Err(error) => {
                tracing::warn!("{}", error);
                Ok(TrackOutcome::WriteFailed { resolution, error })
            }
        }
    }

    async fn pause(&self) -> Result<(), LyricsError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(LyricsError::Cancelled),
            _ = tokio::time::sleep(self.request_delay) => Ok(()),
        }
    }
}
