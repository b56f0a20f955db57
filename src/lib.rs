//! Collect an artist's lyrics from Genius, grouped by album, and compute
//! descriptive statistics per album.

pub mod analysis;
pub mod collect;
pub mod config;
pub mod error;
pub mod genius;
pub mod lyrics;
pub mod retry;
pub mod storage;

pub use collect::{ArtistQuery, Collector, Dataset, SongRecord};
pub use error::{CollectError, Result};
