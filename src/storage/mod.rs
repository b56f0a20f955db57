use crate::collect::{Dataset, SongRecord};
use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Collected datasets, one per artist name.
///
/// There is no expiry: once an artist is stored it is served from here until
/// it is replaced or forgotten explicitly.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let s = Self {
            conn: Connection::open_in_memory().context("open in-memory db")?,
        };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS datasets (
  artist TEXT PRIMARY KEY,
  song_count INTEGER NOT NULL,
  collected_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS songs (
  artist TEXT NOT NULL,
  position INTEGER NOT NULL,
  title TEXT NOT NULL,
  url TEXT NOT NULL,
  album TEXT NOT NULL,
  lyrics TEXT NOT NULL,
  PRIMARY KEY (artist, position)
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    /// Replace whatever is stored for `artist` with `dataset`, all or nothing.
    pub fn store(&mut self, artist: &str, dataset: &Dataset, now_unix: i64) -> anyhow::Result<()> {
        let tx = self.conn.transaction().context("begin store")?;
        tx.execute("DELETE FROM songs WHERE artist=?1", params![artist])
            .context("clear songs")?;
        {
            let mut stmt = tx
                .prepare(
                    r#"
INSERT INTO songs(artist, position, title, url, album, lyrics)
VALUES(?1, ?2, ?3, ?4, ?5, ?6)
"#,
                )
                .context("prepare song insert")?;
            for (position, song) in dataset.iter().enumerate() {
                stmt.execute(params![
                    artist,
                    position as i64,
                    song.title,
                    song.url,
                    song.album,
                    song.lyrics
                ])
                .with_context(|| format!("insert song {}", song.url))?;
            }
        }
        tx.execute(
            r#"
INSERT INTO datasets(artist, song_count, collected_at)
VALUES(?1, ?2, ?3)
ON CONFLICT(artist) DO UPDATE SET
  song_count=excluded.song_count,
  collected_at=excluded.collected_at
"#,
            params![artist, dataset.len() as i64, now_unix],
        )
        .context("record dataset")?;
        tx.commit().context("commit store")?;
        Ok(())
    }

    /// The stored dataset for `artist`, in its original order.
    pub fn load(&self, artist: &str) -> anyhow::Result<Option<Dataset>> {
        let known: Option<i64> = self
            .conn
            .query_row(
                "SELECT collected_at FROM datasets WHERE artist=?1",
                params![artist],
                |row| row.get(0),
            )
            .optional()
            .context("query datasets")?;
        if known.is_none() {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            r#"
SELECT title, url, album, lyrics
FROM songs
WHERE artist=?1
ORDER BY position
"#,
        )?;
        let songs = stmt
            .query_map(params![artist], |row| {
                Ok(SongRecord {
                    title: row.get(0)?,
                    url: row.get(1)?,
                    album: row.get(2)?,
                    lyrics: row.get(3)?,
                })
            })?
            .collect::<Result<Dataset, _>>()
            .context("read songs")?;
        Ok(Some(songs))
    }

    /// Drop the stored dataset. Returns whether there was one.
    pub fn forget(&mut self, artist: &str) -> anyhow::Result<bool> {
        let tx = self.conn.transaction().context("begin forget")?;
        tx.execute("DELETE FROM songs WHERE artist=?1", params![artist])
            .context("delete songs")?;
        let removed = tx
            .execute("DELETE FROM datasets WHERE artist=?1", params![artist])
            .context("delete dataset")?;
        tx.commit().context("commit forget")?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(titles: &[&str]) -> Dataset {
        titles
            .iter()
            .map(|t| SongRecord {
                title: t.to_string(),
                url: format!("https://genius.com/{t}"),
                album: "A".to_string(),
                lyrics: format!("{t}\nsecond line"),
            })
            .collect()
    }

    #[test]
    fn test_store_and_load_keeps_order() {
        let mut s = Storage::open_in_memory().unwrap();
        let ds = dataset(&["zeta", "alpha", "mid"]);
        s.store("Band", &ds, 100).unwrap();

        assert_eq!(s.load("Band").unwrap(), Some(ds));
        assert_eq!(s.load("Other").unwrap(), None);
    }

    #[test]
    fn test_empty_dataset_is_still_cached() {
        let mut s = Storage::open_in_memory().unwrap();
        s.store("Band", &Dataset::default(), 100).unwrap();
        assert_eq!(s.load("Band").unwrap(), Some(Dataset::default()));
    }

    #[test]
    fn test_store_replaces_previous() {
        let mut s = Storage::open_in_memory().unwrap();
        s.store("Band", &dataset(&["a", "b", "c"]), 100).unwrap();
        s.store("Band", &dataset(&["d"]), 200).unwrap();
        assert_eq!(s.load("Band").unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_forget() {
        let mut s = Storage::open_in_memory().unwrap();
        s.store("Band", &dataset(&["a"]), 100).unwrap();
        assert!(s.forget("Band").unwrap());
        assert!(!s.forget("Band").unwrap());
        assert_eq!(s.load("Band").unwrap(), None);
    }
}
