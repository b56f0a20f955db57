use crate::collect::Dataset;
use anyhow::ensure;

/// A song mentions a topic when its weight reaches this.
pub const MENTION_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumTopics {
    pub album: String,
    /// Songs mentioning each topic, indexed like the labels.
    pub mentions: Vec<usize>,
}

/// Count, per album, the songs that mention each topic.
///
/// `weights` holds one row per song in dataset order and one column per label,
/// as produced by an external topic model.
pub fn topic_prevalence(
    dataset: &Dataset,
    albums: &[String],
    weights: &[Vec<f64>],
    labels: &[String],
) -> anyhow::Result<Vec<AlbumTopics>> {
    ensure!(
        weights.len() == dataset.len(),
        "topic matrix has {} rows for {} songs",
        weights.len(),
        dataset.len()
    );
    if let Some((i, row)) = weights.iter().enumerate().find(|(_, r)| r.len() != labels.len()) {
        anyhow::bail!("row {} has {} weights for {} topics", i, row.len(), labels.len());
    }

    Ok(albums
        .iter()
        .map(|album| {
            let mut mentions = vec![0; labels.len()];
            for (song, row) in dataset.iter().zip(weights) {
                if song.album != *album {
                    continue;
                }
                for (count, w) in mentions.iter_mut().zip(row) {
                    if *w >= MENTION_THRESHOLD {
                        *count += 1;
                    }
                }
            }
            AlbumTopics {
                album: album.clone(),
                mentions,
            }
        })
        .collect())
}
