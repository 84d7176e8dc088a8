//! Internal domain models for lyrics resolution.
//!
//! These types are OUR types - they don't change when a lyrics site changes
//! its markup or its API. Every provider response gets converted into these
//! types by the provider's adapter.

use std::fmt;

/// Search query for one track.
///
/// Built once per track by [`TrackQuery::new`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery {
    /// Artist as read from the file's tags
    pub artist: String,
    /// Title as read from the file's tags
    pub title: String,
    /// `"<artist> - <title>"` with one trailing annotation group stripped
    pub search_string: String,
}

/// How well a provider's hit matches the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Returned title and artist are both contained in the query
    Exact,
    /// At least one of them is not
    Inexact,
}

/// Which site the lyrics came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LyricsSource {
    /// Scraped HTML site serving time-tagged lyrics
    Lyricsify,
    /// JSON search API plus page scrape, plain lyrics
    Genius,
}

impl LyricsSource {
    /// Display name used in report lines and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Lyricsify => "Lyricsify",
            Self::Genius => "Genius",
        }
    }

    /// Whether this source serves synced (time-tagged) lyrics.
    pub fn is_synced(self) -> bool {
        matches!(self, Self::Lyricsify)
    }
}

impl fmt::Display for LyricsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lyrics text located by a provider.
///
/// Never holds blank text; construct through [`FoundLyrics::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundLyrics {
    lyrics: String,
    confidence: Confidence,
    source_url: Option<String>,
}

impl FoundLyrics {
    /// Returns `None` when `lyrics` is empty or whitespace only.
    pub fn new(
        lyrics: impl Into<String>,
        confidence: Confidence,
        source_url: Option<String>,
    ) -> Option<Self> {
        let lyrics = lyrics.into();
        if lyrics.trim().is_empty() {
            return None;
        }
        Some(Self {
            lyrics,
            confidence,
            source_url,
        })
    }

    pub fn lyrics(&self) -> &str {
        &self.lyrics
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn into_parts(self) -> (String, Confidence, Option<String>) {
        (self.lyrics, self.confidence, self.source_url)
    }
}

/// What a single provider call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// Usable lyrics
    Found(FoundLyrics),
    /// Song located and known to have no lyrics
    Instrumental { confidence: Confidence },
    /// No usable match; the next provider may be tried
    NotFound,
    /// Provider is walled off for the rest of the run
    Blocked(String),
}

impl ProviderOutcome {
    /// Confidence of the hit, if the outcome came from a hit at all.
    pub fn confidence(&self) -> Option<Confidence> {
        match self {
            Self::Found(found) => Some(found.confidence()),
            Self::Instrumental { confidence } => Some(*confidence),
            Self::NotFound | Self::Blocked(_) => None,
        }
    }
}

/// Final per-track disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Exact match, lyrics ready to write
    Success,
    /// Low-confidence match accepted because require-exact is off
    Inexact,
    /// Song has no lyrics; nothing must be written
    Instrumental,
    /// Existing lyrics are kept
    Skip(SkipReason),
    /// No provider produced anything usable
    NotFound,
}

/// Why existing lyrics were preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file has lyrics and the run does not overwrite
    AlreadyHasLyrics,
    /// Only a synced replacement was allowed and none was found
    NoSyncedReplacement,
}

/// The orchestrator's answer for one track.
///
/// Created fresh per track and handed to the caller, which performs any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub disposition: Disposition,
    pub lyrics: Option<String>,
    pub provider_used: Option<LyricsSource>,
    pub reference_url: Option<String>,
}

impl Resolution {
    /// A resolution carrying only a disposition.
    pub fn bare(disposition: Disposition) -> Self {
        Self {
            disposition,
            lyrics: None,
            provider_used: None,
            reference_url: None,
        }
    }

    /// Whether the caller should write `lyrics` into the file.
    pub fn should_write(&self) -> bool {
        matches!(
            self.disposition,
            Disposition::Success | Disposition::Inexact
        ) && self.lyrics.is_some()
    }
}

/// Errors that can occur while resolving lyrics
#[derive(Debug, Clone, thiserror::Error)]
pub enum LyricsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Rate limited by {0}")]
    RateLimited(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("{provider} is blocking automated requests: {reason}")]
    Blocked { provider: LyricsSource, reason: String },

    #[error("Lyrics lookup cancelled")]
    Cancelled,

    #[error("Invalid client configuration: {0}")]
    Client(String),
}

impl LyricsError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_lyrics_rejects_blank_text() {
        assert!(FoundLyrics::new("", Confidence::Exact, None).is_none());
        assert!(FoundLyrics::new("  \n\t", Confidence::Exact, None).is_none());
        assert!(FoundLyrics::new("la la", Confidence::Exact, None).is_some());
    }

    #[test]
    fn test_outcome_confidence() {
        let found = FoundLyrics::new("words", Confidence::Inexact, None).unwrap();
        assert_eq!(
            ProviderOutcome::Found(found).confidence(),
            Some(Confidence::Inexact)
        );
        assert_eq!(
            ProviderOutcome::Instrumental {
                confidence: Confidence::Exact
            }
            .confidence(),
            Some(Confidence::Exact)
        );
        assert_eq!(ProviderOutcome::NotFound.confidence(), None);
    }

    #[test]
    fn test_should_write_only_with_lyrics() {
        let mut resolution = Resolution::bare(Disposition::Success);
        assert!(!resolution.should_write());
        resolution.lyrics = Some("text".to_string());
        assert!(resolution.should_write());

        let instrumental = Resolution {
            lyrics: Some("text".to_string()),
            ..Resolution::bare(Disposition::Instrumental)
        };
        assert!(!instrumental.should_write());
    }

    #[test]
    fn test_error_classification() {
        let blocked = LyricsError::Blocked {
            provider: LyricsSource::Genius,
            reason: "cloudflare".to_string(),
        };
        assert!(!blocked.is_transient());
        assert!(!LyricsError::Cancelled.is_transient());
        assert!(LyricsError::Network("timeout".to_string()).is_transient());
        assert!(
            LyricsError::Http {
                status: 503,
                url: "x".to_string()
            }
            .is_transient()
        );
        assert!(
            !LyricsError::Http {
                status: 404,
                url: "x".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_source_names() {
        assert_eq!(LyricsSource::Lyricsify.to_string(), "Lyricsify");
        assert!(LyricsSource::Lyricsify.is_synced());
        assert!(!LyricsSource::Genius.is_synced());
    }
}
