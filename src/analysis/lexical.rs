use crate::analysis::stopwords;
use crate::collect::Dataset;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumRichness {
    pub album: String,
    pub total_words: usize,
    pub distinct_words: usize,
    /// Distinct over total, as a percentage. `None` when nothing survived
    /// filtering.
    pub richness: Option<f64>,
}

/// Words that count towards richness: lines joined by spaces, split on single
/// spaces, minus stopwords, filler and one-character tokens. Case is kept.
pub fn content_words(lyrics: &str) -> impl Iterator<Item = &str> {
    lyrics
        .split(['\n', ' '])
        .filter(|w| w.chars().count() > 1)
        .filter(|w| !stopwords::ENGLISH.contains(w))
        .filter(|w| !stopwords::FILLER.contains(w))
}

pub fn lexical_richness(dataset: &Dataset, albums: &[String]) -> Vec<AlbumRichness> {
    dataset
        .by_album(albums)
        .into_iter()
        .map(|(album, songs)| {
            let words: Vec<&str> = songs.iter().flat_map(|s| content_words(&s.lyrics)).collect();
            let distinct = words.iter().collect::<HashSet<_>>().len();
            let richness =
                (!words.is_empty()).then(|| distinct as f64 / words.len() as f64 * 100.0);
            AlbumRichness {
                album: album.to_string(),
                total_words: words.len(),
                distinct_words: distinct,
                richness,
            }
        })
        .collect()
}
