//! Consumet-style HTTP client
//!
//! Thin GET client over a provider's `/info` and `/watch` endpoints.
//! Endpoint URLs come from configuration; one client serves one provider.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;

use super::types::{InfoResponse, WatchResponse};
use crate::error::{check_response, json_with_limit, ClientError};

/// URL-encode a string for safe use in query parameters
fn url_encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Shared HTTP client for all provider requests (connection pooling).
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build shared provider HTTP client")
});

pub struct ConsumetClient {
    episodes_url: String,
    watch_url: String,
    client: Client,
}

impl ConsumetClient {
    /// Create a client for one provider's endpoints (reuses the shared
    /// connection pool).
    #[must_use]
    pub fn new(episodes_url: impl Into<String>, watch_url: impl Into<String>) -> Self {
        Self {
            episodes_url: episodes_url.into(),
            watch_url: watch_url.into(),
            client: SHARED_CLIENT.clone(),
        }
    }

    fn info_url(&self, title_id: i64) -> String {
        format!("{}?id={title_id}", self.episodes_url)
    }

    fn watch_url_for(&self, episode_id: &str) -> String {
        format!("{}?episodeId={}", self.watch_url, url_encode(episode_id))
    }

    /// Fetch title info including the episode catalog.
    pub async fn fetch_info(&self, title_id: i64) -> Result<InfoResponse, ClientError> {
        let url = self.info_url(title_id);
        tracing::debug!(%url, "fetching episode catalog");
        let resp = self.client.get(&url).send().await?;
        let resp = check_response(resp)?;
        json_with_limit(resp).await
    }

    /// Fetch the stream set for one episode.
    pub async fn fetch_watch(&self, episode_id: &str) -> Result<WatchResponse, ClientError> {
        let url = self.watch_url_for(episode_id);
        tracing::debug!(%url, "fetching stream sources");
        let resp = self.client.get(&url).send().await?;
        let resp = check_response(resp)?;
        json_with_limit(resp).await
    }
}
