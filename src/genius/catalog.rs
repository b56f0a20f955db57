use crate::error::{CollectError, Result};
use crate::genius::models::{Envelope, SearchResponse, SongsResponse};
use crate::genius::{ArtistId, CatalogEntry, GeniusSource};
use tracing::{debug, info};

/// Resolve an artist name to the primary artist of the top search hit.
///
/// No fuzzy matching is attempted: a misspelled or ambiguous name resolves to
/// whatever Genius ranks first.
pub async fn resolve_artist_id<S>(source: &S, artist_name: &str) -> Result<ArtistId>
where
    S: GeniusSource + ?Sized,
{
    let raw = source.search(artist_name).await?;
    let parsed: Envelope<SearchResponse> = serde_json::from_value(raw)
        .map_err(|source| CollectError::MalformedResponse {
            endpoint: "search",
            source,
        })?;

    let top = parsed
        .response
        .hits
        .into_iter()
        .next()
        .ok_or_else(|| CollectError::NotFound {
            artist: artist_name.to_string(),
        })?;

    let artist = top.result.primary_artist;
    info!(
        "resolved '{}' to artist {} ({})",
        artist_name,
        artist.id,
        artist.name.as_deref().unwrap_or("unnamed")
    );
    Ok(artist.id)
}

/// Walk every page of the artist's songs until `next_page` is null, keeping
/// only songs where the artist is the primary artist.
pub async fn list_artist_songs<S>(
    source: &S,
    artist_id: &ArtistId,
    per_page: u32,
) -> Result<Vec<CatalogEntry>>
where
    S: GeniusSource + ?Sized,
{
    let mut entries = Vec::new();
    let mut page = 1;

    loop {
        let raw = source.artist_songs(artist_id, page, per_page).await?;
        let parsed: Envelope<SongsResponse> = serde_json::from_value(raw)
            .map_err(|source| CollectError::MalformedResponse {
                endpoint: "artist songs",
                source,
            })?;
        let SongsResponse { songs, next_page } = parsed.response;

        let before = entries.len();
        entries.extend(
            songs
                .into_iter()
                .filter(|s| s.primary_artist.id == *artist_id)
                .map(|s| CatalogEntry {
                    title: s.title,
                    url: s.url,
                    primary_artist_id: s.primary_artist.id,
                }),
        );
        debug!(
            "page {}: {} songs credited as primary artist",
            page,
            entries.len() - before
        );

        if next_page.is_none() {
            break;
        }
        page += 1;
    }

    info!("catalog for artist {}: {} songs over {} pages", artist_id, entries.len(), page);
    Ok(entries)
}
