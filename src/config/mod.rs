use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collect::{ArtistQuery, CollectOptions};
use crate::genius::ClientOptions;
use crate::lyrics::ScrapeRules;

/// Environment variable that overrides `genius.token`.
pub const TOKEN_ENV: &str = "GENIUS_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub genius: GeniusConfig,
    pub scrape: ScrapeRules,
    pub artist: ArtistConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeniusConfig {
    /// Client access token from https://genius.com/api-clients
    pub token: Option<String>,
    pub api_base: String,
    /// Sent as `User-Agent` on every request, lyrics pages included.
    pub user_agent: String,
    pub timeout_secs: u64,
    pub retries: u32,
    /// Song pages fetched at once (1 = one after another).
    pub concurrency: usize,
    pub per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ArtistConfig {
    pub name: Option<String>,
    /// Albums to keep, in the order reports should list them.
    pub albums: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

impl Default for GeniusConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.genius.com/".to_string(),
            user_agent: concat!("lyricstat/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 20,
            retries: 3,
            concurrency: 1,
            per_page: 50,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = ProjectDirs::from("dev", "lyricstat", "lyricstat");
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("lyricstat"));
        Self { data_dir }
    }
}

impl Config {
    pub fn cache_path(&self) -> PathBuf {
        self.paths.data_dir.join("datasets.sqlite")
    }

    /// Token from the command line, then the environment, then the file.
    pub fn token(&self, cli: Option<String>) -> anyhow::Result<String> {
        pick_token([cli, std::env::var(TOKEN_ENV).ok(), self.genius.token.clone()])
            .with_context(|| format!("no Genius token: pass --token, set {TOKEN_ENV} or genius.token"))
    }

    pub fn client_options(&self, token: String) -> ClientOptions {
        ClientOptions {
            token,
            api_base: self.genius.api_base.clone(),
            user_agent: self.genius.user_agent.clone(),
            timeout: Duration::from_secs(self.genius.timeout_secs),
            retries: self.genius.retries,
        }
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            per_page: self.genius.per_page,
            concurrency: self.genius.concurrency,
            scrape: self.scrape.clone(),
        }
    }

    /// The configured artist, with command-line values taking precedence.
    pub fn query(&self, artist: Option<String>, albums: Vec<String>) -> anyhow::Result<ArtistQuery> {
        let name = artist
            .or_else(|| self.artist.name.clone())
            .context("no artist: pass --artist or set artist.name")?;
        let albums = if albums.is_empty() {
            self.artist.albums.clone()
        } else {
            albums
        };
        Ok(ArtistQuery::new(name, albums))
    }
}

/// First non-blank candidate, in priority order.
fn pick_token<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|t| !t.trim().is_empty())
}

fn write_private(path: &Path, raw: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    write_private(&path, &raw)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "lyricstat", "lyricstat")
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        write_private(&path, &raw)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[genius]
token = "abc"
concurrency = 4

[artist]
name = "Mac Miller"
albums = ["Swimming", "Circles"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.genius.token.as_deref(), Some("abc"));
        assert_eq!(cfg.genius.concurrency, 4);
        assert_eq!(cfg.genius.per_page, 50);
        assert_eq!(cfg.scrape.album_label, "Album");
        assert_eq!(cfg.artist.albums, ["Swimming", "Circles"]);
    }

    #[test]
    fn test_cli_overrides_artist() {
        let mut cfg = Config::default();
        cfg.artist.name = Some("Configured".to_string());
        cfg.artist.albums = vec!["X".to_string()];

        let q = cfg.query(None, vec![]).unwrap();
        assert_eq!(q.artist_name, "Configured");
        assert_eq!(q.album_allowlist, ["X"]);

        let q = cfg.query(Some("Flag".to_string()), vec!["Y".to_string()]).unwrap();
        assert_eq!(q.artist_name, "Flag");
        assert_eq!(q.album_allowlist, ["Y"]);

        assert!(Config::default().query(None, vec![]).is_err());
    }

    #[test]
    fn test_cli_token_beats_env() {
        let got = pick_token([
            Some("from-flag".to_string()),
            Some("from-env".to_string()),
            Some("from-file".to_string()),
        ]);
        assert_eq!(got.as_deref(), Some("from-flag"));

        let got = pick_token([None, Some("from-env".to_string()), Some("from-file".to_string())]);
        assert_eq!(got.as_deref(), Some("from-env"));

        let got = pick_token([Some("  ".to_string()), Some(String::new()), Some("from-file".to_string())]);
        assert_eq!(got.as_deref(), Some("from-file"));

        assert_eq!(pick_token([None, None, Some(" ".to_string())]), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("lyricstat-cfg-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut cfg = Config::default();
        cfg.artist.name = Some("Band".to_string());
        cfg.genius.retries = 7;

        save(&cfg, Some(&path)).unwrap();
        let back = load(Some(&path)).unwrap();
        assert_eq!(back.artist.name.as_deref(), Some("Band"));
        assert_eq!(back.genius.retries, 7);
        let _ = fs::remove_dir_all(&dir);
    }
}
