//! Genius API Data Transfer Objects
//!
//! These types match what the Genius `/search` endpoint returns, trimmed to
//! the fields we read. Unknown fields are ignored by serde.
//! DO NOT use these types outside the genius module - convert to domain types.
//!
//! API Reference: https://docs.genius.com/#search-h2
//!
//! Example response:
//! ```json
//! {
//!   "meta": {"status": 200},
//!   "response": {
//!     "hits": [{
//!       "type": "song",
//!       "result": {
//!         "id": 378195,
//!         "title": "Song B",
//!         "url": "https://genius.com/Artist-a-song-b-lyrics",
//!         "primary_artist": {"id": 16775, "name": "Artist A"}
//!       }
//!     }]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub response: Option<SearchBody>,
}

/// Status block sent with every response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Meta {
    pub status: u16,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchBody {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One ranked search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Hit {
    /// Always "song" for the search endpoint
    #[serde(rename = "type")]
    pub hit_type: Option<String>,
    pub result: Song,
}

/// Song summary inside a hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Song {
    pub id: Option<u64>,
    pub title: String,
    /// Canonical song page
    pub url: String,
    pub primary_artist: Artist,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: Option<u64>,
    pub name: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
