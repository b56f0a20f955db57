use crate::error::{CollectError, Result};
use crate::genius::{ArtistId, GeniusSource};
use crate::retry::retry_with_backoff;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::debug;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub token: String,
    pub api_base: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub retries: u32,
}

#[derive(Debug, Clone)]
pub struct GeniusClient {
    http: reqwest::Client,
    api_base: String,
    retries: u32,
}

impl GeniusClient {
    pub fn new(opts: &ClientOptions) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&opts.user_agent).context("user agent header")?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", opts.token))
            .context("authorization header")?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(opts.timeout)
            .build()
            .context("build reqwest client")?;

        let mut api_base = opts.api_base.clone();
        if !api_base.ends_with('/') {
            api_base.push('/');
        }

        Ok(Self {
            http,
            api_base,
            retries: opts.retries,
        })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        retry_with_backoff(self.retries, RETRY_BASE_DELAY, url, || self.get_once(url)).await
    }

    async fn get_once(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CollectError::Fetch {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(|source| CollectError::Fetch {
            url: url.to_string(),
            source,
        })
    }

    async fn get_json(&self, url: &str, endpoint: &'static str) -> Result<serde_json::Value> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body)
            .map_err(|source| CollectError::MalformedResponse { endpoint, source })
    }
}

#[async_trait]
impl GeniusSource for GeniusClient {
    async fn search(&self, query: &str) -> Result<serde_json::Value> {
        let url = format!("{}search?q={}", self.api_base, urlencoding::encode(query));
        debug!("genius search: {}", url);
        self.get_json(&url, "search").await
    }

    async fn artist_songs(
        &self,
        artist: &ArtistId,
        page: u32,
        per_page: u32,
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}artists/{}/songs?per_page={}&page={}",
            self.api_base,
            urlencoding::encode(artist.as_str()),
            per_page,
            page
        );
        debug!("genius artist songs: {}", url);
        self.get_json(&url, "artist songs").await
    }

    async fn song_page(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}
