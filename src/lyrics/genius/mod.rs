//! Genius lyrics provider
//!
//! Structure:
//! - `dto.rs` - Data Transfer Objects matching the search API response
//! - `adapter.rs` - Converts DTOs and song pages to domain types
//! - `client.rs` - HTTP client (search + song page)

mod adapter;
mod client;
mod dto;

pub use client::{DEFAULT_API_URL, GeniusClient};
