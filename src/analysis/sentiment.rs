use crate::collect::Dataset;
use anyhow::Context;
use std::collections::HashMap;

/// Lines scoring at or above this are positive; at or below its negation,
/// negative.
pub const POLARITY_THRESHOLD: f64 = 0.5;

/// A sentence-level sentiment model. Implementations return a compound score
/// in `[-1.0, 1.0]`.
pub trait PolarityScorer {
    fn compound(&self, sentence: &str) -> f64;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> f64,
{
    fn compound(&self, sentence: &str) -> f64 {
        self(sentence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

impl Polarity {
    pub fn of(compound: f64) -> Self {
        if compound >= POLARITY_THRESHOLD {
            Self::Positive
        } else if compound > -POLARITY_THRESHOLD {
            Self::Neutral
        } else {
            Self::Negative
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumSentiment {
    pub album: String,
    pub lines: usize,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Compound scores computed ahead of time by an external model, keyed by song
/// URL. Each list holds one score per lyric line, in line order.
pub type LineScores = HashMap<String, Vec<f64>>;

/// Share of positive, neutral and negative lines per album, in percent.
/// Albums without lines report zeros.
pub fn sentiment_distribution<S>(dataset: &Dataset, albums: &[String], scorer: &S) -> Vec<AlbumSentiment>
where
    S: PolarityScorer + ?Sized,
{
    dataset
        .by_album(albums)
        .into_iter()
        .map(|(album, songs)| {
            let scores = songs
                .iter()
                .flat_map(|s| s.lyrics.split('\n'))
                .map(|line| scorer.compound(line));
            tally(album, scores)
        })
        .collect()
}

/// Same as [`sentiment_distribution`], reading the scores from `scores`.
/// Every song must have exactly one score per lyric line.
pub fn sentiment_from_scores(
    dataset: &Dataset,
    albums: &[String],
    scores: &LineScores,
) -> anyhow::Result<Vec<AlbumSentiment>> {
    for song in dataset {
        let lines = song.lyrics.split('\n').count();
        let got = scores
            .get(&song.url)
            .with_context(|| format!("no sentiment scores for {}", song.url))?;
        anyhow::ensure!(
            got.len() == lines,
            "{} has {} lines but {} scores",
            song.url,
            lines,
            got.len()
        );
    }

    Ok(dataset
        .by_album(albums)
        .into_iter()
        .map(|(album, songs)| {
            let per_line = songs
                .iter()
                .filter_map(|s| scores.get(&s.url))
                .flatten()
                .copied();
            tally(album, per_line)
        })
        .collect())
}

fn tally(album: &str, scores: impl Iterator<Item = f64>) -> AlbumSentiment {
    let (mut pos, mut neu, mut neg) = (0usize, 0usize, 0usize);
    for compound in scores {
        match Polarity::of(compound) {
            Polarity::Positive => pos += 1,
            Polarity::Neutral => neu += 1,
            Polarity::Negative => neg += 1,
        }
    }
    let total = pos + neu + neg;
    let pct = |n: usize| {
        if total == 0 {
            0.0
        } else {
            n as f64 / total as f64 * 100.0
        }
    };
    AlbumSentiment {
        album: album.to_string(),
        lines: total,
        positive: pct(pos),
        neutral: pct(neu),
        negative: pct(neg),
    }
}
