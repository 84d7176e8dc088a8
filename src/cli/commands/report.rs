//! Per-track report lines.
//!
//! `"{n}\tof {total} : {Status} : {message} : {name}"`, one per track, with
//! the status and message columns padded so runs line up in a terminal.

use std::fmt;

use crate::lyrics::{Disposition, SkipReason, TrackOutcome, TrackReport};
use crate::metadata::MetadataError;

/// Status column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Skipped,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Success => "Success",
            Self::Skipped => "Skipped",
            Self::Failed => "Failed",
        })
    }
}

/// Status, message and optional trailing link for an outcome.
pub fn describe(outcome: &TrackOutcome, dry_run: bool) -> (Status, String, Option<String>) {
    match outcome {
        TrackOutcome::Resolved { resolution, .. } => {
            let provider = resolution
                .provider_used
                .map_or("?", |source| source.name());
            match resolution.disposition {
                Disposition::Success | Disposition::Inexact => {
                    let verb = if dry_run { "found for" } else { "saved to" };
                    let link = (resolution.disposition == Disposition::Inexact)
                        .then(|| resolution.reference_url.clone())
                        .flatten();
                    let marker = if link.is_some() { " (i)" } else { "" };
                    (
                        Status::Success,
                        format!("Lyrics from {provider} {verb}{marker}"),
                        link,
                    )
                }
                Disposition::Instrumental => (
                    Status::Success,
                    format!("{provider} says song is an instrumental"),
                    None,
                ),
                Disposition::Skip(SkipReason::AlreadyHasLyrics) => {
                    (Status::Skipped, "File already has lyrics".to_string(), None)
                }
                Disposition::Skip(SkipReason::NoSyncedReplacement) => (
                    Status::Failed,
                    "No synced lyrics found, preserving".to_string(),
                    None,
                ),
                Disposition::NotFound => {
                    (Status::Failed, "Lyrics not found for".to_string(), None)
                }
            }
        }
        TrackOutcome::MetadataFailed(error) => (Status::Failed, metadata_message(error), None),
        TrackOutcome::WriteFailed { .. } => {
            (Status::Failed, "Could not save lyrics to".to_string(), None)
        }
    }
}

fn metadata_message(error: &MetadataError) -> String {
    match error {
        MetadataError::Unsupported { .. } => "Unsupported file format",
        MetadataError::Unreadable { .. } => "File could not be read",
        MetadataError::MissingTags { .. } => "Artist/Title could not be found",
        MetadataError::Write { .. } => "Could not save lyrics to",
    }
    .to_string()
}

/// Format one report line.
pub fn format_line(report: &TrackReport<'_>, dry_run: bool) -> String {
    let (status, message, link) = describe(&report.outcome, dry_run);
    let mut line = format!(
        "{}\tof {} : {:<7} : {:<36} : {}",
        report.position,
        report.total,
        status,
        message,
        report.file.display_name.trim()
    );
    if let Some(url) = link {
        line.push_str(&format!("  <{url}>"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::{LyricsSource, Resolution, TrackFile};
    use std::path::PathBuf;

    fn report(file: &TrackFile, outcome: TrackOutcome) -> TrackReport<'_> {
        TrackReport {
            position: 3,
            total: 12,
            file,
            outcome,
        }
    }

    fn resolved(resolution: Resolution) -> TrackOutcome {
        TrackOutcome::Resolved {
            resolution,
            written: true,
        }
    }

    fn found(disposition: Disposition, url: Option<&str>) -> Resolution {
        Resolution {
            disposition,
            lyrics: Some("words".to_string()),
            provider_used: Some(LyricsSource::Genius),
            reference_url: url.map(String::from),
        }
    }

    #[test]
    fn test_success_line_layout() {
        let file = TrackFile::new("/music/song.mp3", "song.mp3");
        let line = format_line(
            &report(&file, resolved(found(Disposition::Success, Some("https://g/x")))),
            false,
        );
        assert_eq!(
            line,
            "3\tof 12 : Success : Lyrics from Genius saved to          : song.mp3"
        );
    }

    #[test]
    fn test_inexact_appends_reference_url() {
        let file = TrackFile::new("/music/song.mp3", "song.mp3");
        let line = format_line(
            &report(&file, resolved(found(Disposition::Inexact, Some("https://g/x")))),
            false,
        );
        assert!(line.contains("Lyrics from Genius saved to (i)"));
        assert!(line.ends_with("song.mp3  <https://g/x>"));
    }

    #[test]
    fn test_status_column_is_padded() {
        let file = TrackFile::new("/music/song.mp3", "song.mp3");
        let line = format_line(
            &report(&file, resolved(Resolution::bare(Disposition::NotFound))),
            false,
        );
        assert!(line.contains(" : Failed  : Lyrics not found for"));
    }

    #[test]
    fn test_dispositions_map_to_statuses() {
        let status = |disposition| describe(&resolved(Resolution::bare(disposition)), false).0;
        assert_eq!(status(Disposition::Instrumental), Status::Success);
        assert_eq!(
            status(Disposition::Skip(SkipReason::AlreadyHasLyrics)),
            Status::Skipped
        );
        assert_eq!(
            status(Disposition::Skip(SkipReason::NoSyncedReplacement)),
            Status::Failed
        );
        assert_eq!(status(Disposition::NotFound), Status::Failed);
    }

    #[test]
    fn test_instrumental_names_provider() {
        let resolution = Resolution {
            provider_used: Some(LyricsSource::Genius),
            ..Resolution::bare(Disposition::Instrumental)
        };
        let (_, message, link) = describe(&resolved(resolution), false);
        assert_eq!(message, "Genius says song is an instrumental");
        assert_eq!(link, None);
    }

    #[test]
    fn test_dry_run_wording() {
        let (_, message, _) = describe(&resolved(found(Disposition::Success, None)), true);
        assert_eq!(message, "Lyrics from Genius found for");
    }

    #[test]
    fn test_metadata_failures_are_distinguishable() {
        let path = PathBuf::from("/music/x");
        let unsupported = describe(
            &TrackOutcome::MetadataFailed(MetadataError::Unsupported { path: path.clone() }),
            false,
        );
        let unreadable = describe(
            &TrackOutcome::MetadataFailed(MetadataError::Unreadable {
                path: path.clone(),
                message: "bad header".to_string(),
            }),
            false,
        );
        assert_eq!(unsupported.0, Status::Failed);
        assert_ne!(unsupported.1, unreadable.1);
    }
}
