//! Genius metadata API and lyrics pages.
//!
//! The pipeline only ever talks to [`GeniusSource`]; [`api::GeniusClient`] is
//! the network-backed implementation.

pub mod api;
pub mod catalog;
pub mod models;

pub use api::{ClientOptions, GeniusClient};
pub use catalog::{list_artist_songs, resolve_artist_id};
pub use models::{ArtistId, CatalogEntry};

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GeniusSource: Send + Sync {
    /// Raw JSON of `GET search?q=...`.
    async fn search(&self, query: &str) -> Result<serde_json::Value>;

    /// Raw JSON of `GET artists/{id}/songs?per_page=..&page=..`.
    async fn artist_songs(
        &self,
        artist: &ArtistId,
        page: u32,
        per_page: u32,
    ) -> Result<serde_json::Value>;

    /// HTML body of a song's lyrics page.
    async fn song_page(&self, url: &str) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod fixture;
