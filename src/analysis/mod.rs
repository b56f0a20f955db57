//! Per-album descriptive statistics over a collected dataset.
//!
//! Results are always listed in allow-list order. Sentiment scoring and topic
//! modelling are supplied by the caller; only the aggregation lives here.

pub mod lexical;
pub mod sentiment;
pub mod stopwords;
pub mod topics;

pub use lexical::{AlbumRichness, lexical_richness};
pub use sentiment::{
    AlbumSentiment, LineScores, PolarityScorer, sentiment_distribution, sentiment_from_scores,
};
pub use topics::{AlbumTopics, topic_prevalence};
