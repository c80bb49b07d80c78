//! radio-browser directory client.
//!
//! Six read-only endpoints, all answering with a JSON array of stations:
//! the five feeds in [`crate::feeds::Feed`] and the name search. One attempt
//! per call; no timeouts beyond reqwest's defaults.

use reqwest::Client;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::feeds::Feed;
use crate::station::{parse_stations, Station};

/// Path of the name-search endpoint.
pub const SEARCH_PATH: &str = "/json/stations/search";

/// Most results a search asks for; a configured limit is clamped to `1..=20`.
pub const MAX_SEARCH_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: Client,
    base_url: String,
    search_limit: usize,
}

impl DirectoryClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit.clamp(1, MAX_SEARCH_LIMIT),
        })
    }

    /// Client against `base_url` with every other setting at its default.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    /// Fetch one of the five fixed feeds.
    pub async fn feed(&self, feed: Feed) -> Result<Vec<Station>> {
        self.get_stations(feed.path(), &[]).await
    }

    /// Name search. `query` must already be normalized
    /// (see [`crate::search::normalize_query`]); reqwest escapes it.
    pub async fn search(&self, query: &str) -> Result<Vec<Station>> {
        let limit = self.search_limit.to_string();
        self.get_stations(SEARCH_PATH, &[("name", query), ("limit", limit.as_str())])
            .await
    }

    async fn get_stations(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Station>> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.bytes().await?;
        let stations = parse_stations(&body)?;
        debug!("GET {} -> {} stations", path, stations.len());
        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = DirectoryClient::with_base_url("http://localhost:1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1");
        assert_eq!(client.search_limit(), 20);
    }

    #[test]
    fn search_limit_is_clamped() {
        for (configured, expected) in [(0, 1), (5, 5), (20, 20), (500, MAX_SEARCH_LIMIT)] {
            let client = DirectoryClient::new(&ApiConfig {
                search_limit: configured,
                ..ApiConfig::default()
            })
            .unwrap();
            assert_eq!(client.search_limit(), expected, "configured {}", configured);
        }
    }
}
