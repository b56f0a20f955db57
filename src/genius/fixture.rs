//! Canned [`GeniusSource`] for pipeline tests.

use crate::error::{CollectError, Result};
use crate::genius::{ArtistId, GeniusSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search(String),
    ArtistSongs(String, u32),
    SongPage(String),
}

#[derive(Default)]
pub struct FixtureSource {
    search: Option<serde_json::Value>,
    song_lists: Vec<serde_json::Value>,
    pages: HashMap<String, String>,
    calls: Mutex<Vec<Call>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, v: serde_json::Value) -> Self {
        self.search = Some(v);
        self
    }

    /// Pages are served in the order they are added, starting at page 1.
    pub fn with_songs_page(mut self, v: serde_json::Value) -> Self {
        self.song_lists.push(v);
        self
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn song_pages_requested(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ArtistSongs(_, page) => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GeniusSource for FixtureSource {
    async fn search(&self, query: &str) -> Result<serde_json::Value> {
        self.record(Call::Search(query.to_string()));
        Ok(self.search.clone().expect("fixture has no search response"))
    }

    async fn artist_songs(
        &self,
        artist: &ArtistId,
        page: u32,
        _per_page: u32,
    ) -> Result<serde_json::Value> {
        self.record(Call::ArtistSongs(artist.to_string(), page));
        let idx = page.checked_sub(1).expect("pages start at 1") as usize;
        Ok(self
            .song_lists
            .get(idx)
            .cloned()
            .unwrap_or_else(|| panic!("fixture has no songs page {page}")))
    }

    async fn song_page(&self, url: &str) -> Result<String> {
        self.record(Call::SongPage(url.to_string()));
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| CollectError::HttpStatus {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}
