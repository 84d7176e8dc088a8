//! Trait definitions for lyrics providers.
//!
//! The resolver only sees [`LyricsProvider`], so tests can substitute the
//! scripted providers in [`mocks`] for the real scraping clients.

use async_trait::async_trait;

use super::domain::{LyricsError, LyricsSource, ProviderOutcome, TrackQuery};
use super::genius::GeniusClient;
use super::lyricsify::LyricsifyClient;

/// A source of lyrics for one query.
///
/// `find` only fails with [`LyricsError::Cancelled`]. Failures that concern
/// just this lookup come back as `NotFound`, and an anti-bot wall as
/// `Blocked`.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Which source this is
    fn source(&self) -> LyricsSource;

    /// Look up lyrics for a query.
    async fn find(&self, query: &TrackQuery) -> Result<ProviderOutcome, LyricsError>;
}

/// Fold a client's lookup result into the provider contract.
fn settle(
    source: LyricsSource,
    query: &TrackQuery,
    result: Result<ProviderOutcome, LyricsError>,
) -> Result<ProviderOutcome, LyricsError> {
    match result {
        Ok(outcome) => Ok(outcome),
        Err(LyricsError::Cancelled) => Err(LyricsError::Cancelled),
        Err(LyricsError::Blocked { reason, .. }) => Ok(ProviderOutcome::Blocked(reason)),
        Err(e) => {
            tracing::warn!(
                "{} lookup for {:?} failed, treating as not found: {}",
                source,
                query.search_string,
                e
            );
            Ok(ProviderOutcome::NotFound)
        }
    }
}

#[async_trait]
impl LyricsProvider for LyricsifyClient {
    fn source(&self) -> LyricsSource {
        LyricsSource::Lyricsify
    }

    async fn find(&self, query: &TrackQuery) -> Result<ProviderOutcome, LyricsError> {
        settle(self.source(), query, self.lookup(query).await)
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    fn source(&self) -> LyricsSource {
        LyricsSource::Genius
    }

    async fn find(&self, query: &TrackQuery) -> Result<ProviderOutcome, LyricsError> {
        settle(self.source(), query, self.lookup(query).await)
    }
}

/// Scripted providers for testing.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::lyrics::domain::{Confidence, FoundLyrics};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that answers every query with the same outcome.
    pub struct MockProvider {
        source: LyricsSource,
        /// Outcome to return (an error takes precedence)
        pub outcome: ProviderOutcome,
        pub error: Option<LyricsError>,
        calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        pub fn with_outcome(source: LyricsSource, outcome: ProviderOutcome) -> Self {
            Self {
                source,
                outcome,
                error: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Found lyrics with the given confidence and a fake page URL.
        pub fn found(source: LyricsSource, lyrics: &str, confidence: Confidence) -> Self {
            let url = format!("https://{}.example/song", source.name().to_lowercase());
            let found = FoundLyrics::new(lyrics, confidence, Some(url)).expect("non-blank lyrics");
            Self::with_outcome(source, ProviderOutcome::Found(found))
        }

        pub fn instrumental(source: LyricsSource, confidence: Confidence) -> Self {
            Self::with_outcome(source, ProviderOutcome::Instrumental { confidence })
        }

        pub fn not_found(source: LyricsSource) -> Self {
            Self::with_outcome(source, ProviderOutcome::NotFound)
        }

        pub fn blocked(source: LyricsSource) -> Self {
            Self::with_outcome(source, ProviderOutcome::Blocked("challenge page".to_string()))
        }

        pub fn with_error(source: LyricsSource, error: LyricsError) -> Self {
            Self {
                error: Some(error),
                ..Self::not_found(source)
            }
        }

        /// Shared counter of `find` calls, usable after the mock is boxed.
        pub fn call_counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl LyricsProvider for MockProvider {
        fn source(&self) -> LyricsSource {
            self.source
        }

        async fn find(&self, _query: &TrackQuery) -> Result<ProviderOutcome, LyricsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            Ok(self.outcome.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_counts_calls() {
            let mock = MockProvider::not_found(LyricsSource::Genius);
            let calls = mock.call_counter();
            let query = TrackQuery::new("A", "B");
            mock.find(&query).await.unwrap();
            mock.find(&query).await.unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_mock_error_takes_precedence() {
            let mock = MockProvider::with_error(LyricsSource::Genius, LyricsError::Cancelled);
            let result = mock.find(&TrackQuery::new("A", "B")).await;
            assert!(matches!(result, Err(LyricsError::Cancelled)));
        }
    }
}
