//! Lyrics resolution - finds lyrics for tagged tracks on external sites.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **Query builder** (`query.rs`) - Search strings and match confidence
//! - **Normalizer** (`normalize.rs`) - Reflows scraped fragments into clean text
//! - **Providers** (`lyricsify/`, `genius/`) - DTOs, adapters and HTTP clients per site
//! - **Traits** (`traits.rs`) - The provider seam, with mocks for tests
//! - **Service** (`service.rs`) - Per-track resolution state machine
//! - **Batch** (`batch.rs`) - Runs the resolver over files and writes results
//!
//! Providers never write to files; the batch runner owns every write.
//!
//! # Usage
//!
//! ```ignore
//! use lyrics::{LyricsResolver, RunPolicy, TrackQuery};
//!
//! let resolver = LyricsResolver::new(RunPolicy::default())
//!     .with_fallback(Box::new(GeniusClient::new(http, token)));
//!
//! let query = TrackQuery::new("Artist A", "Song B");
//! let resolution = resolver.resolve(&query, None).await?;
//! println!("{:?} from {:?}", resolution.disposition, resolution.provider_used);
//! ```

pub mod batch;
pub mod domain;
pub mod genius;
pub mod http;
pub mod lyricsify;
pub mod normalize;
pub mod query;
pub mod service;
pub mod traits;

pub use batch::{BatchRunner, BatchSummary, TrackFile, TrackOutcome, TrackReport};
pub use domain::{
    Confidence, Disposition, LyricsError, LyricsSource, Resolution, SkipReason, TrackQuery,
};
pub use genius::GeniusClient;
pub use http::{HttpFetcher, RetryPolicy};
pub use lyricsify::LyricsifyClient;
pub use service::{LyricsResolver, RunPolicy};
pub use traits::LyricsProvider;
