//! Adapter layer: Convert Genius DTOs and song pages to domain outcomes
//!
//! This is the ONLY place where Genius DTO types and page markup are
//! converted to domain types.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::dto;
use crate::lyrics::domain::{Confidence, FoundLyrics, LyricsError, ProviderOutcome, TrackQuery};
use crate::lyrics::normalize::normalize;
use crate::lyrics::query::match_confidence;

static LYRICS_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[data-lyrics-container="true"]"#).expect("lyrics selector is valid")
});

/// Attribute Genius puts on headers and ads nested inside lyrics containers.
const EXCLUDE_ATTR: &str = "data-exclude-from-selection";

/// The top-ranked hit of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongHit {
    pub title: String,
    pub artist: String,
    pub url: String,
}

/// Take the first hit of a search response.
///
/// `Ok(None)` when the search returned no hits.
pub fn top_hit(response: dto::SearchResponse) -> Result<Option<SongHit>, LyricsError> {
    if let Some(meta) = &response.meta
        && meta.status != 200
    {
        return Err(LyricsError::Parse(format!(
            "search returned status {}: {}",
            meta.status,
            meta.message.as_deref().unwrap_or("no message")
        )));
    }

    let Some(body) = response.response else {
        return Err(LyricsError::Parse("search response has no body".to_string()));
    };

    Ok(body.hits.into_iter().next().map(|hit| SongHit {
        title: hit.result.title,
        artist: hit.result.primary_artist.name,
        url: hit.result.url,
    }))
}

/// Confidence of a hit against the query.
pub fn hit_confidence(query: &TrackQuery, hit: &SongHit) -> Confidence {
    match_confidence(&query.search_string, &hit.title, Some(&hit.artist))
}

/// Raw text fragments of every lyrics container, in page order.
///
/// Each text node is one fragment; containers are separated by a fragment
/// boundary. Text under excluded elements is skipped.
pub fn extract_fragments(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&LYRICS_CONTAINER)
        .flat_map(container_fragments)
        .collect()
}

fn container_fragments(container: ElementRef<'_>) -> Vec<String> {
    container
        .descendants()
        .filter_map(|node| {
            let text: &str = node.value().as_text()?;
            let excluded = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != container.id())
                .filter_map(ElementRef::wrap)
                .any(|element| element.value().attr(EXCLUDE_ATTR) == Some("true"));
            (!excluded).then(|| text.to_string())
        })
        .collect()
}

/// Convert a fetched song page into an outcome.
///
/// A page whose containers yield no text is an instrumental: the song is
/// known to Genius but has no lyrics.
pub fn to_outcome(hit: &SongHit, confidence: Confidence, html: &str) -> ProviderOutcome {
    let lyrics = normalize(&extract_fragments(html));
    match FoundLyrics::new(lyrics, confidence, Some(hit.url.clone())) {
        Some(found) => ProviderOutcome::Found(found),
        None => ProviderOutcome::Instrumental { confidence },
    }
}
