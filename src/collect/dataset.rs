use serde::{Deserialize, Serialize};

/// One kept song. Never modified once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub title: String,
    pub url: String,
    pub album: String,
    pub lyrics: String,
}

/// The output of one collection run, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    songs: Vec<SongRecord>,
}

impl Dataset {
    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SongRecord> {
        self.songs.iter()
    }

    /// Songs grouped per album, one group for every album in `albums` and in
    /// that order. Albums with no songs get an empty group.
    pub fn by_album<'a>(&'a self, albums: &'a [String]) -> Vec<(&'a str, Vec<&'a SongRecord>)> {
        albums
            .iter()
            .map(|album| {
                let songs: Vec<&SongRecord> = self.songs.iter().filter(|s| s.album == *album).collect();
                (album.as_str(), songs)
            })
            .collect()
    }
}

impl FromIterator<SongRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = SongRecord>>(iter: I) -> Self {
        Self {
            songs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a SongRecord;
    type IntoIter = std::slice::Iter<'a, SongRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.songs.iter()
    }
}
