//! Scraping song pages
//!
//! This module provides:
//! - Parsing a fetched lyrics page into a navigable document
//! - Extraction of the lyrics block and the album label from that document
//! - Normalisation of raw lyric text (annotations, blank lines, spacing)
//!
//! Everything that depends on Genius markup lives here, so a layout change
//! upstream only touches [`ScrapeRules`] and this module.

pub mod clean;
pub mod page;

pub use clean::clean_lyrics;
pub use page::{PageExtractor, ScrapeRules, SongPage};
