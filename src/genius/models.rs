use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Genius artist identifier. The API sends numbers; older payloads and
/// hand-written fixtures sometimes carry strings, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ArtistId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Str(String),
        }
        Ok(match Raw::deserialize(d)? {
            Raw::Num(n) => Self(n.to_string()),
            Raw::Str(s) => Self(s),
        })
    }
}

/// A song credited to the artist, before its page has been scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    pub url: String,
    pub primary_artist_id: ArtistId,
}

// Wire shapes. Genius wraps every payload in `{"meta": ..., "response": ...}`.

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub response: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    pub result: SearchResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    pub primary_artist: ArtistRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistRef {
    pub id: ArtistId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SongsResponse {
    pub songs: Vec<ApiSong>,
    /// `null` on the last page. The key itself must be present.
    #[serde(deserialize_with = "required_nullable")]
    pub next_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSong {
    pub title: String,
    pub url: String,
    pub primary_artist: ArtistRef,
}

fn required_nullable<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d)
}
