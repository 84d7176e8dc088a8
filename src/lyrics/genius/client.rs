//! Genius HTTP client
//!
//! The search goes through the JSON API with a bearer token; the lyrics
//! themselves are only on the public song page, which is scraped.

use super::{adapter, dto};
use crate::lyrics::domain::{Confidence, LyricsError, ProviderOutcome, TrackQuery};
use crate::lyrics::http::HttpFetcher;

/// Genius API root
pub const DEFAULT_API_URL: &str = "https://api.genius.com";

/// Genius search + scrape client
pub struct GeniusClient {
    http: HttpFetcher,
    api_url: String,
    access_token: String,
    require_exact: bool,
}

impl GeniusClient {
    /// Create a client for the public API
    pub fn new(http: HttpFetcher, access_token: impl Into<String>) -> Self {
        Self::with_api_url(http, access_token, DEFAULT_API_URL)
    }

    /// Create a client against another API root (tests)
    pub fn with_api_url(
        http: HttpFetcher,
        access_token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            require_exact: false,
        }
    }

    /// Stop at the search step when the top hit is only an inexact match.
    pub fn require_exact(mut self, require_exact: bool) -> Self {
        self.require_exact = require_exact;
        self
    }

    /// Search for the query and scrape the top hit's song page.
    pub async fn lookup(&self, query: &TrackQuery) -> Result<ProviderOutcome, LyricsError> {
        let url = format!(
            "{}/search?q={}",
            self.api_url,
            urlencoding::encode(&query.search_string)
        );

        let body = self
            .http
            .get(&url, Some(&self.access_token))
            .await?
            .into_success()?;
        let response: dto::SearchResponse = serde_json::from_str(&body)
            .map_err(|e| LyricsError::Parse(format!("Genius search response: {e}")))?;

        let Some(hit) = adapter::top_hit(response)? else {
            tracing::debug!("No Genius hits for {:?}", query.search_string);
            return Ok(ProviderOutcome::NotFound);
        };
        let confidence = adapter::hit_confidence(query, &hit);
        tracing::debug!(
            "Genius top hit {:?} by {:?} ({:?})",
            hit.title,
            hit.artist,
            confidence
        );
        if self.require_exact && confidence == Confidence::Inexact {
            tracing::debug!("Skipping inexact Genius hit {}", hit.url);
            return Ok(ProviderOutcome::NotFound);
        }

        let page = self.http.get(&hit.url, None).await?;
        if page.is_challenge() {
            return Ok(ProviderOutcome::Blocked(format!(
                "challenge page at {}",
                page.url
            )));
        }
        if page.status == 404 {
            return Ok(ProviderOutcome::NotFound);
        }
        let html = page.into_success()?;

        Ok(adapter::to_outcome(&hit, confidence, &html))
    }
}
