//! Search query construction and match-confidence classification.
//!
//! Both providers judge their hits with [`match_confidence`], so a single
//! require-exact policy means the same thing for every source.

use std::sync::LazyLock;

use regex::Regex;

use super::domain::{Confidence, TrackQuery};

/// Separator between artist and title in a search string.
pub const ARTIST_TITLE_SEPARATOR: &str = " - ";

/// One parenthetical group closing at the very end, with an optional leading space.
static TRAILING_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\([^()]*\)$").expect("annotation pattern is valid"));

impl TrackQuery {
    /// Build the query for a track from its tag values.
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        let artist = artist.into();
        let title = title.into();
        let search_string = build_query(&artist, &title);
        Self {
            artist,
            title,
            search_string,
        }
    }
}

/// Join artist and title as `"<artist> - <title>"` and strip one trailing
/// annotation such as `(feat. X)`.
///
/// Case and inner whitespace are left alone; case is only ignored when
/// comparing hits in [`match_confidence`].
pub fn build_query(artist: &str, title: &str) -> String {
    let joined = format!("{artist}{ARTIST_TITLE_SEPARATOR}{title}");
    strip_trailing_annotation(&joined).to_string()
}

/// Remove a single parenthetical group that ends the string.
pub fn strip_trailing_annotation(text: &str) -> &str {
    match TRAILING_ANNOTATION.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Classify a provider hit against the search string.
///
/// `Exact` when the title and the artist are both case-insensitive substrings
/// of the search string. `artist` is `None` when the provider did not declare
/// one, in which case only the title is checked.
pub fn match_confidence(search_string: &str, title: &str, artist: Option<&str>) -> Confidence {
    let haystack = search_string.to_lowercase();
    let contained = |needle: &str| haystack.contains(&needle.to_lowercase());

    if contained(title) && artist.is_none_or(contained) {
        Confidence::Exact
    } else {
        Confidence::Inexact
    }
}
