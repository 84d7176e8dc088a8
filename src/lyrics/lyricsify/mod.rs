//! Lyricsify integration
//!
//! Scraped HTML site serving synced (LRC) lyrics. No credential required.

mod adapter;
mod client;

pub use client::{DEFAULT_BASE_URL, LyricsifyClient};
