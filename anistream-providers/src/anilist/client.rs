//! AniList GraphQL catalog client
//!
//! Stateless POST client implementing `CatalogClient`. Listing queries
//! always ask for the first page of ten, matching the browse surface.

use std::sync::LazyLock;
use std::time::Duration;

use anistream_core::catalog::{CatalogClient, CatalogError};
use anistream_core::model::{Title, TitleId, TitleInfo};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::types::{GraphQlResponse, MediaData, PageData};
use crate::error::{check_response, json_with_limit, ClientError};

static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build shared catalog HTTP client")
});

const TRENDING_QUERY: &str = r"
query {
  Page(page: 1, perPage: 10) {
    media(type: ANIME, sort: TRENDING_DESC) {
      id
      title { english romaji }
      episodes
      coverImage { large }
    }
  }
}";

const POPULAR_QUERY: &str = r"
query {
  Page(page: 1, perPage: 10) {
    media(type: ANIME, sort: POPULARITY_DESC) {
      id
      title { english romaji }
      episodes
      coverImage { large }
    }
  }
}";

const SEARCH_QUERY: &str = r"
query ($search: String) {
  Page(page: 1, perPage: 10) {
    media(type: ANIME, search: $search) {
      id
      title { english romaji }
      episodes
      coverImage { large }
    }
  }
}";

const INFO_QUERY: &str = r"
query ($id: Int) {
  Media(id: $id, type: ANIME) {
    id
    title { english romaji }
    description
    episodes
    coverImage { large }
  }
}";

pub struct AniListCatalog {
    endpoint: String,
    client: Client,
}

impl AniListCatalog {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: SHARED_CLIENT.clone(),
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ClientError> {
        let body = json!({ "query": query, "variables": variables });
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let resp = check_response(resp)?;
        let parsed: GraphQlResponse<T> = json_with_limit(resp).await?;
        extract(parsed)
    }

    async fn listing(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Vec<Title>, CatalogError> {
        let data: PageData = self.query(query, variables).await?;
        Ok(data
            .page
            .media
            .into_iter()
            .map(super::types::MediaEntry::into_title)
            .collect())
    }
}

/// Unwrap a GraphQL envelope, surfacing the first reported error when the
/// data is absent.
fn extract<T>(parsed: GraphQlResponse<T>) -> Result<T, ClientError> {
    if let Some(data) = parsed.data {
        return Ok(data);
    }
    let message = parsed
        .errors
        .into_iter()
        .next()
        .map_or_else(|| "empty response".to_string(), |e| e.message);
    Err(ClientError::Api(message))
}

#[async_trait]
impl CatalogClient for AniListCatalog {
    async fn trending(&self) -> Result<Vec<Title>, CatalogError> {
        self.listing(TRENDING_QUERY, json!({})).await
    }

    async fn popular(&self) -> Result<Vec<Title>, CatalogError> {
        self.listing(POPULAR_QUERY, json!({})).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Title>, CatalogError> {
        self.listing(SEARCH_QUERY, json!({ "search": query })).await
    }

    async fn info(&self, id: TitleId) -> Result<TitleInfo, CatalogError> {
        let data: MediaData = self.query(INFO_QUERY, json!({ "id": id.0 })).await?;
        Ok(TitleInfo {
            display_name: data.media.title.english.or(data.media.title.romaji),
            description: data.media.description,
            episode_count_hint: data.media.episodes,
        })
    }
}
