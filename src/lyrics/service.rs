//! Lyrics resolver - decides, per track, which provider to ask and what to
//! do with the answer
//!
//! Each track walks a small state machine:
//! 1. `Start` - existing lyrics without `overwrite` end the walk as a skip
//! 2. `TryPrimary` - the synced source, only when the run enables it
//! 3. `TryFallback` - the plain source, only with a credential and when the
//!    run allows an unsynced result to stand in for existing lyrics
//! 4. `Done` - the accepted outcome (if any) becomes a [`Resolution`]
//!
//! The first `Found` or `Instrumental` wins; no later provider is consulted.

use super::domain::{
    Confidence, Disposition, LyricsError, LyricsSource, ProviderOutcome, Resolution, SkipReason,
    TrackQuery,
};
use super::traits::LyricsProvider;

/// Run-level switches, read-only while tracks are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    /// Replace lyrics that are already in the file
    pub overwrite: bool,
    /// Let plain lyrics replace existing ones
    pub allow_unsynced_overwrite: bool,
    /// Discard inexact hits
    pub require_exact_match: bool,
    /// Consult the synced source first
    pub synced_source_enabled: bool,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            overwrite: false,
            allow_unsynced_overwrite: false,
            require_exact_match: true,
            synced_source_enabled: false,
        }
    }
}

/// An outcome a provider produced that ends the walk.
type Accepted = (LyricsSource, ProviderOutcome);

#[derive(Debug)]
enum ResolveState {
    Start,
    TryPrimary,
    TryFallback,
    Done(Option<Accepted>),
}

/// Resolves lyrics for one track at a time
pub struct LyricsResolver {
    policy: RunPolicy,
    /// Synced source
    primary: Option<Box<dyn LyricsProvider>>,
    /// Plain source, present only with a credential
    fallback: Option<Box<dyn LyricsProvider>>,
}

impl LyricsResolver {
    /// Create a resolver with no providers
    pub fn new(policy: RunPolicy) -> Self {
        Self {
            policy,
            primary: None,
            fallback: None,
        }
    }

    pub fn with_primary(mut self, provider: Box<dyn LyricsProvider>) -> Self {
        self.primary = Some(provider);
        self
    }

    pub fn with_fallback(mut self, provider: Box<dyn LyricsProvider>) -> Self {
        self.fallback = Some(provider);
        self
    }

    pub fn policy(&self) -> &RunPolicy {
        &self.policy
    }

    /// Resolve lyrics for `query` given the lyrics already in the file.
    ///
    /// Errors are run-fatal: [`LyricsError::Blocked`] when a provider hit an
    /// anti-bot wall, [`LyricsError::Cancelled`] when the run was stopped.
    pub async fn resolve(
        &self,
        query: &TrackQuery,
        existing: Option<&str>,
    ) -> Result<Resolution, LyricsError> {
        let has_existing = existing.is_some_and(|text| !text.trim().is_empty());
        let mut state = ResolveState::Start;

        loop {
            tracing::trace!("{:?}: {:?}", query.search_string, state);
            state = match state {
                ResolveState::Start => {
                    if has_existing && !self.policy.overwrite {
                        return Ok(Resolution::bare(Disposition::Skip(
                            SkipReason::AlreadyHasLyrics,
                        )));
                    }
                    if self.policy.synced_source_enabled && self.primary.is_some() {
                        ResolveState::TryPrimary
                    } else {
                        ResolveState::TryFallback
                    }
                }
                ResolveState::TryPrimary => match &self.primary {
                    Some(provider) => match self.consult(provider.as_ref(), query).await? {
                        Some(accepted) => ResolveState::Done(Some(accepted)),
                        None => ResolveState::TryFallback,
                    },
                    None => ResolveState::TryFallback,
                },
                ResolveState::TryFallback => {
                    let permitted = !has_existing || self.policy.allow_unsynced_overwrite;
                    match &self.fallback {
                        Some(provider) if permitted => {
                            ResolveState::Done(self.consult(provider.as_ref(), query).await?)
                        }
                        _ => ResolveState::Done(None),
                    }
                }
                ResolveState::Done(accepted) => return Ok(self.finish(accepted, has_existing)),
            };
        }
    }

    /// Ask one provider; `None` means "keep walking".
    async fn consult(
        &self,
        provider: &dyn LyricsProvider,
        query: &TrackQuery,
    ) -> Result<Option<Accepted>, LyricsError> {
        let source = provider.source();
        let outcome = provider.find(query).await?;

        match outcome {
            ProviderOutcome::Blocked(reason) => Err(LyricsError::Blocked {
                provider: source,
                reason,
            }),
            ProviderOutcome::NotFound => {
                tracing::debug!("{} has nothing for {:?}", source, query.search_string);
                Ok(None)
            }
            outcome
                if self.policy.require_exact_match
                    && outcome.confidence() == Some(Confidence::Inexact) =>
            {
                tracing::debug!(
                    "Discarding inexact {} hit for {:?}",
                    source,
                    query.search_string
                );
                Ok(None)
            }
            outcome => Ok(Some((source, outcome))),
        }
    }

    fn finish(&self, accepted: Option<Accepted>, has_existing: bool) -> Resolution {
        match accepted {
            Some((source, ProviderOutcome::Found(found))) => {
                let (lyrics, confidence, url) = found.into_parts();
                Resolution {
                    disposition: match confidence {
                        Confidence::Exact => Disposition::Success,
                        Confidence::Inexact => Disposition::Inexact,
                    },
                    lyrics: Some(lyrics),
                    provider_used: Some(source),
                    reference_url: url,
                }
            }
            Some((source, ProviderOutcome::Instrumental { .. })) => Resolution {
                provider_used: Some(source),
                ..Resolution::bare(Disposition::Instrumental)
            },
            // Only Found and Instrumental are ever accepted
            Some((_, ProviderOutcome::NotFound | ProviderOutcome::Blocked(_))) | None => {
                if has_existing && !self.policy.allow_unsynced_overwrite {
                    Resolution::bare(Disposition::Skip(SkipReason::NoSyncedReplacement))
                } else {
                    Resolution::bare(Disposition::NotFound)
                }
            }
        }
    }
}
