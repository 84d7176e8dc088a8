//! Test utilities and fixtures for lyricize tests.
//!
//! This module provides wiremock helpers, page fixtures for both
//! providers and a tiny WAV writer, to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{lyricsify_search_page, page, received};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let server = MockServer::start().await;
//!     Mock::given(path("/lyrics/a/b"))
//!         .respond_with(page(200, lyricsify_search_page(&[])))
//!         .expect(1)
//!         .mount(&server)
//!         .await;
//!     // point a client at server.uri() ...
//! }
//! ```

use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::tag::{Accessor, Tag, TagExt, TagType};
use wiremock::{MockServer, Request, ResponseTemplate};

// ============================================================================
// HTTP helpers
// ============================================================================

/// A response with `body` as its text.
pub fn page(status: u16, body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_string(body.into())
}

/// Requests `server` has seen so far, in arrival order.
pub async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

/// URL of a local port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

// ============================================================================
// Page fixtures
// ============================================================================

/// Lyricsify search results linking to each of `links`.
pub fn lyricsify_search_page(links: &[&str]) -> String {
    let results: String = links
        .iter()
        .map(|href| format!(r#"<div class="li"><a href="{href}" class="title">Result</a></div>"#))
        .collect();
    format!(
        r#"<html><head><title>Search</title></head><body>
<nav><a href="/lyrics/top">Top lyrics</a></nav>
<div class="main">{results}</div>
</body></html>"#
    )
}

/// Lyricsify song page with an `<h1>` and a lyrics block of `lines`.
pub fn lyricsify_song_page(heading: &str, lines: &[&str]) -> String {
    format!(
        r#"<html><head><title>{heading}</title></head><body>
<h1>{heading}</h1>
<div id="lyrics_1_details" class="main-page">{}</div>
</body></html>"#,
        lines.join("\n")
    )
}

/// Cloudflare-style interstitial.
pub fn challenge_page() -> String {
    r#"<html><head><title>Just a moment...</title></head><body>
<div id="cloudflare_content">Checking your browser before accessing the site.</div>
</body></html>"#
        .to_string()
}

/// Genius `/search` response with one hit per `(title, artist, url)`.
pub fn genius_search_json(hits: &[(&str, &str, &str)]) -> String {
    let hits: Vec<_> = hits
        .iter()
        .enumerate()
        .map(|(i, (title, artist, url))| {
            serde_json::json!({
                "index": "song",
                "type": "song",
                "result": {
                    "id": 1000 + i,
                    "title": title,
                    "url": url,
                    "primary_artist": {"id": 2000 + i, "name": artist}
                }
            })
        })
        .collect();
    serde_json::json!({
        "meta": {"status": 200},
        "response": {"hits": hits}
    })
    .to_string()
}

/// Genius song page with one lyrics container per entry of `containers`.
///
/// Entries are inner HTML and are inserted as-is.
pub fn genius_song_page(containers: &[&str]) -> String {
    let body: String = containers
        .iter()
        .map(|inner| format!(r#"<div data-lyrics-container="true" class="Lyrics__Container">{inner}</div>"#))
        .collect();
    format!(
        r#"<html><head><title>Song Lyrics | Genius</title></head><body>
<div id="lyrics-root">{body}</div>
</body></html>"#
    )
}

// ============================================================================
// Audio fixtures
// ============================================================================

/// Write a short silent PCM WAV to `dir/name`, tagged with
/// `(artist, title)` in the format's primary tag when given.
pub fn write_test_wav(dir: &Path, name: &str, tags: Option<(&str, &str)>) -> PathBuf {
    let path = write_silent_wav(dir, name);
    if let Some((artist, title)) = tags {
        let tagged_file = lofty::read_from_path(&path).expect("Failed to read test WAV");
        tag_test_file(&path, tagged_file.primary_tag_type(), artist, title);
    }
    path
}

/// Like [`write_test_wav`], with artist and title in a tag of `tag_type` only.
pub fn write_test_wav_with_tag(
    dir: &Path,
    name: &str,
    tag_type: TagType,
    artist: &str,
    title: &str,
) -> PathBuf {
    let path = write_silent_wav(dir, name);
    tag_test_file(&path, tag_type, artist, title);
    path
}

fn tag_test_file(path: &Path, tag_type: TagType, artist: &str, title: &str) {
    let mut tag = Tag::new(tag_type);
    tag.set_artist(artist.to_string());
    tag.set_title(title.to_string());
    tag.save_to_path(path, WriteOptions::default())
        .expect("Failed to tag test WAV");
}

fn write_silent_wav(dir: &Path, name: &str) -> PathBuf {
    const SAMPLE_RATE: u32 = 8000;
    let samples = vec![0u8; 1600];

    let mut wav = Vec::with_capacity(44 + samples.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + samples.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    wav.extend_from_slice(&samples);

    let path = dir.join(name);
    std::fs::write(&path, wav).expect("Failed to write test WAV");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genius_fixture_is_valid_json() {
        let json = genius_search_json(&[("T", "A", "https://genius.com/x")]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["response"]["hits"][0]["result"]["title"], "T");
    }
}
