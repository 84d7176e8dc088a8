//! Adapter layer: Convert Lyricsify HTML pages to domain outcomes
//!
//! This is the ONLY place that knows the site's markup. If Lyricsify changes
//! its pages, only the selectors and helpers in this file need to change.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::lyrics::domain::{Confidence, FoundLyrics, ProviderOutcome, TrackQuery};
use crate::lyrics::http::is_challenge_page;
use crate::lyrics::query::{ARTIST_TITLE_SEPARATOR, match_confidence};

/// Links from the search page to a song page.
static RESULT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/lyric/"]"#).expect("result selector is valid"));

static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("heading selector is valid"));

/// The lyrics block; its id is generated per song (`lyrics_<n>_details`).
static LYRICS_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[id^="lyrics_"][id$="_details"]"#).expect("lyrics selector is valid")
});

/// LRC artist tag that opens the synced block.
const LRC_HEADER: &str = "[ar:";

/// Artist and title declared on a song page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongHeading {
    /// Only present when the heading has an artist/title separator
    pub artist: Option<String>,
    pub title: String,
}

/// Path of the search page for a search string, relative to the site root.
///
/// `"Artist A - Song B"` becomes `lyrics/artist-a/song-b`.
pub fn search_path(search_string: &str) -> String {
    let segments: Vec<String> = search_string
        .to_lowercase()
        .split(ARTIST_TITLE_SEPARATOR)
        .map(|segment| urlencoding::encode(&segment.replace(' ', "-")).into_owned())
        .collect();
    format!("lyrics/{}", segments.join("/"))
}

/// The `href` of the first song link on a search page.
pub fn first_result_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_LINK)
        .filter_map(|link| link.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(String::from)
}

/// Parse the `<h1>` of a song page, e.g. `"Artist A - Song B Lyrics"`.
pub fn parse_heading(html: &str) -> Option<SongHeading> {
    let document = Html::parse_document(html);
    let raw: String = document.select(&HEADING).next()?.text().collect();
    let heading = strip_lyrics_suffix(raw.split_whitespace().collect::<Vec<_>>().join(" "));

    let parsed = match heading.split_once(ARTIST_TITLE_SEPARATOR) {
        Some((artist, title)) => SongHeading {
            artist: Some(artist.trim().to_string()),
            title: title.trim().to_string(),
        },
        None => SongHeading {
            artist: None,
            title: heading.trim().to_string(),
        },
    };

    (!parsed.title.is_empty()).then_some(parsed)
}

fn strip_lyrics_suffix(heading: String) -> String {
    const SUFFIX: &str = " lyrics";
    let Some(cut) = heading.len().checked_sub(SUFFIX.len()) else {
        return heading;
    };
    if heading.is_char_boundary(cut) && heading[cut..].eq_ignore_ascii_case(SUFFIX) {
        heading[..cut].to_string()
    } else {
        heading
    }
}

/// Text of the lyrics block, one trimmed line per row, starting at the LRC header.
///
/// `None` when the page has no lyrics block at all.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let container = document.select(&LYRICS_CONTAINER).next()?;
    let text: String = container.text().collect();

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let start = lines
        .iter()
        .position(|line| line.starts_with(LRC_HEADER))
        .unwrap_or(0);

    Some(lines[start..].join("\n"))
}

/// Convert a fetched song page into an outcome for `query`.
///
/// The heading must match the query; a mismatch is discarded as `NotFound`
/// because this source has no inexact mode.
pub fn to_outcome(query: &TrackQuery, html: &str, page_url: &str) -> ProviderOutcome {
    if is_challenge_page(html) {
        return ProviderOutcome::Blocked(format!("challenge page at {page_url}"));
    }

    let Some(heading) = parse_heading(html) else {
        tracing::debug!("No song heading on {}", page_url);
        return ProviderOutcome::NotFound;
    };

    let confidence = match_confidence(
        &query.search_string,
        &heading.title,
        heading.artist.as_deref(),
    );
    if confidence == Confidence::Inexact {
        tracing::debug!(
            "Lyricsify heading {:?} does not match {:?}",
            heading,
            query.search_string
        );
        return ProviderOutcome::NotFound;
    }

    extract_lyrics(html)
        .and_then(|lyrics| FoundLyrics::new(lyrics, Confidence::Exact, Some(page_url.to_string())))
        .map_or(ProviderOutcome::NotFound, ProviderOutcome::Found)
}
