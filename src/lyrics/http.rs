//! Shared HTTP plumbing for the lyrics providers.
//!
//! Every provider request goes through [`HttpFetcher::get`], which:
//! - honors the run's [`CancellationToken`] before and during each request
//!   and during backoff sleeps
//! - applies the injected [`RetryPolicy`] to transient failures only
//! - hands back the page body for any status, so adapters can recognise an
//!   anti-bot challenge served with a 403/503
//!
//! A challenge page is never retried: the same wall would answer again.

use std::sync::LazyLock;
use std::time::Duration;

use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;

use super::domain::LyricsError;

/// Markers of a Cloudflare-style interstitial.
static CHALLENGE_MARKERS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#cloudflare_content, #cf-browser-verification, #challenge-form, #cf-challenge-running")
        .expect("challenge selector is valid")
});

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));

/// How failed requests are retried.
///
/// The default performs a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Sleep before the first retry
    pub initial_backoff: Duration,
    /// Factor applied to the sleep after each retry
    pub multiplier: u32,
}

impl RetryPolicy {
    /// One attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            multiplier: 1,
        }
    }

    /// Doubling backoff starting at `initial_backoff`.
    pub fn exponential(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            multiplier: 2,
        }
    }

    /// Sleep before retry number `retry` (0 = first retry).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(self.multiplier.saturating_pow(retry))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// A fetched page of any status.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Page {
    /// Whether the body is an anti-bot interstitial.
    pub fn is_challenge(&self) -> bool {
        is_challenge_page(&self.body)
    }

    /// The body of a 2xx page, or the matching error.
    pub fn into_success(self) -> Result<String, LyricsError> {
        match self.status {
            200..=299 => Ok(self.body),
            429 => Err(LyricsError::RateLimited(self.url)),
            status => Err(LyricsError::Http {
                status,
                url: self.url,
            }),
        }
    }

    fn is_retryable(&self) -> bool {
        (self.status == 429 || self.status >= 500) && !self.is_challenge()
    }
}

/// HTTP client shared by the providers of one run.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl HttpFetcher {
    /// Create a fetcher sending `user_agent` with every request.
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        retry: RetryPolicy,
        cancel: CancellationToken,
    ) -> Result<Self, LyricsError> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| LyricsError::Client(e.to_string()))?;

        Ok(Self {
            client,
            retry,
            cancel,
        })
    }

    /// GET `url`, optionally with a bearer token, retrying per policy.
    pub async fn get(&self, url: &str, bearer: Option<&str>) -> Result<Page, LyricsError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut retry = 0;

        loop {
            let result = self.get_once(url, bearer).await;
            let last_attempt = retry + 1 >= attempts;

            match result {
                Ok(page) if page.is_retryable() && !last_attempt => {
                    tracing::debug!("HTTP {} from {}, retrying", page.status, url);
                }
                Err(e) if e.is_transient() && !last_attempt => {
                    tracing::debug!("Request to {} failed ({}), retrying", url, e);
                }
                other => return other,
            }

            self.sleep(self.retry.backoff_for(retry)).await?;
            retry += 1;
        }
    }

    async fn get_once(&self, url: &str, bearer: Option<&str>) -> Result<Page, LyricsError> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(LyricsError::Cancelled),
            response = request.send() => response.map_err(|e| LyricsError::Network(e.to_string()))?,
        };

        let status = response.status().as_u16();
        let body = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(LyricsError::Cancelled),
            body = response.text() => body.map_err(|e| LyricsError::Network(e.to_string()))?,
        };

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(Page {
            url: url.to_string(),
            status,
            body,
        })
    }

    async fn sleep(&self, duration: Duration) -> Result<(), LyricsError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(LyricsError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

/// Whether an HTML body is an anti-scraping interstitial.
pub fn is_challenge_page(body: &str) -> bool {
    if body.contains("challenge-platform") {
        return true;
    }
    let document = Html::parse_document(body);
    if document.select(&CHALLENGE_MARKERS).next().is_some() {
        return true;
    }
    document
        .select(&TITLE)
        .next()
        .map(|title| title.text().collect::<String>())
        .is_some_and(|title| title.trim().eq_ignore_ascii_case("just a moment..."))
}

/// Resolve a possibly relative link found on a page.
pub fn resolve_link(base: &str, href: &str) -> Option<String> {
    let base = reqwest::Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}
