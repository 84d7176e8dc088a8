//! Lyricsify HTTP client
//!
//! Lyricsify serves time-tagged (LRC) lyrics as plain HTML pages. There is
//! no API: a lookup is two page fetches.
//!
//! 1. The search page at `/lyrics/<artist>/<title>`, which lists song links
//! 2. The first linked song page, which carries the heading and lyrics block
//!
//! Either page may be replaced by an anti-bot challenge, which ends the run.

use super::adapter;
use crate::lyrics::domain::{LyricsError, ProviderOutcome, TrackQuery};
use crate::lyrics::http::{HttpFetcher, Page, resolve_link};

/// Site root used unless the config overrides it.
pub const DEFAULT_BASE_URL: &str = "https://www.lyricsify.com";

/// Lyricsify scraping client
pub struct LyricsifyClient {
    http: HttpFetcher,
    base_url: String,
}

impl LyricsifyClient {
    /// Create a client for the public site
    pub fn new(http: HttpFetcher) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    /// Create a client against another site root (mirrors, tests)
    pub fn with_base_url(http: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Look up synced lyrics for a query.
    ///
    /// Network and parse failures are returned as errors; the provider trait
    /// decides which of them are fatal.
    pub async fn lookup(&self, query: &TrackQuery) -> Result<ProviderOutcome, LyricsError> {
        let search_url = format!(
            "{}/{}",
            self.base_url,
            adapter::search_path(&query.search_string)
        );

        let search_page = self.http.get(&search_url, None).await?;
        if search_page.is_challenge() {
            return Ok(blocked(&search_page));
        }
        let Some(html) = page_html(search_page)? else {
            return Ok(ProviderOutcome::NotFound);
        };

        let Some(href) = adapter::first_result_link(&html) else {
            tracing::debug!("No Lyricsify results for {:?}", query.search_string);
            return Ok(ProviderOutcome::NotFound);
        };
        let song_url = resolve_link(&search_url, &href)
            .ok_or_else(|| LyricsError::Parse(format!("bad result link {href:?}")))?;

        let song_page = self.http.get(&song_url, None).await?;
        if song_page.is_challenge() {
            return Ok(blocked(&song_page));
        }
        let Some(html) = page_html(song_page)? else {
            return Ok(ProviderOutcome::NotFound);
        };

        Ok(adapter::to_outcome(query, &html, &song_url))
    }
}

/// Body of a successful page; `None` for a 404.
fn page_html(page: Page) -> Result<Option<String>, LyricsError> {
    if page.status == 404 {
        return Ok(None);
    }
    page.into_success().map(Some)
}

fn blocked(page: &Page) -> ProviderOutcome {
    ProviderOutcome::Blocked(format!("challenge page at {}", page.url))
}
