//! Collection run: artist name in, album-filtered dataset out.

pub mod dataset;

pub use dataset::{Dataset, SongRecord};

use crate::error::{CollectError, Result};
use crate::genius::{self, CatalogEntry, GeniusSource};
use crate::lyrics::{PageExtractor, ScrapeRules, SongPage};
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

/// Who to collect and which albums to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistQuery {
    pub artist_name: String,
    pub album_allowlist: Vec<String>,
}

impl ArtistQuery {
    pub fn new(artist_name: impl Into<String>, album_allowlist: Vec<String>) -> Self {
        Self {
            artist_name: artist_name.into(),
            album_allowlist,
        }
    }

    pub fn allows(&self, album: &str) -> bool {
        self.album_allowlist.iter().any(|a| a == album)
    }
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub per_page: u32,
    /// Song pages fetched at once. 1 keeps the run strictly sequential.
    pub concurrency: usize,
    pub scrape: ScrapeRules,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            per_page: 50,
            concurrency: 1,
            scrape: ScrapeRules::default(),
        }
    }
}

pub struct Collector<S> {
    source: S,
    extractor: PageExtractor,
    per_page: u32,
    concurrency: usize,
}

impl<S: GeniusSource> Collector<S> {
    pub fn new(source: S, options: &CollectOptions) -> Result<Self> {
        Ok(Self {
            source,
            extractor: PageExtractor::new(&options.scrape)?,
            per_page: options.per_page,
            concurrency: options.concurrency.max(1),
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve the artist, walk the catalog, scrape every song and keep the
    /// ones on an allowed album. Any failure aborts the whole run.
    pub async fn collect(&self, query: &ArtistQuery) -> Result<Dataset> {
        let artist_id = genius::resolve_artist_id(&self.source, &query.artist_name).await?;
        let entries = genius::list_artist_songs(&self.source, &artist_id, self.per_page).await?;
        let total = entries.len();

        // `buffered` yields in input order, so the dataset keeps catalog order
        // whatever the concurrency.
        let records: Vec<Option<SongRecord>> = stream::iter(entries)
            .map(|entry| self.scrape(entry, query))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let dataset: Dataset = records.into_iter().flatten().collect();
        info!(
            "collected {} of {} songs for '{}'",
            dataset.len(),
            total,
            query.artist_name
        );
        Ok(dataset)
    }

    async fn scrape(&self, entry: CatalogEntry, query: &ArtistQuery) -> Result<Option<SongRecord>> {
        let html = self.source.song_page(&entry.url).await?;
        info!("scraped {}", entry.url);
        self.enrich(entry, &html, query)
    }

    fn enrich(&self, entry: CatalogEntry, html: &str, query: &ArtistQuery) -> Result<Option<SongRecord>> {
        let page = SongPage::parse(html);

        let album = self.extractor.album(&page);
        if !query.allows(&album) {
            debug!("skipping '{}': album '{}' not requested", entry.title, album);
            return Ok(None);
        }

        let lyrics = self.extractor.lyrics(&page).map_err(|e| match e {
            CollectError::Extraction(msg) => {
                CollectError::Extraction(format!("{}: {}", entry.url, msg))
            }
            other => other,
        })?;

        Ok(Some(SongRecord {
            title: entry.title,
            url: entry.url,
            album,
            lyrics,
        }))
    }
}
