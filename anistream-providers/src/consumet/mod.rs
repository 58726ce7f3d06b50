//! Consumet-style stream provider: HTTP client plus the `StreamProvider`
//! adapter mapping wire responses into the core model.

mod client;
mod types;

pub use client::ConsumetClient;
pub use types::{EpisodeEntry, InfoResponse, SourceEntry, WatchResponse};

use anistream_core::model::{Episode, EpisodeId, StreamFormat, StreamSource, TitleId};
use anistream_core::provider::{ProviderError, StreamProvider};
use async_trait::async_trait;

/// `StreamProvider` backed by one Consumet-style provider API.
pub struct ConsumetProvider {
    client: ConsumetClient,
}

impl ConsumetProvider {
    #[must_use]
    pub fn new(episodes_url: impl Into<String>, watch_url: impl Into<String>) -> Self {
        Self {
            client: ConsumetClient::new(episodes_url, watch_url),
        }
    }
}

#[async_trait]
impl StreamProvider for ConsumetProvider {
    async fn fetch_episodes(&self, title: TitleId) -> Result<Vec<Episode>, ProviderError> {
        let info = self.client.fetch_info(title.0).await?;
        Ok(map_episodes(info))
    }

    async fn fetch_sources(
        &self,
        episode: &EpisodeId,
    ) -> Result<Vec<StreamSource>, ProviderError> {
        let watch = self.client.fetch_watch(&episode.0).await?;
        Ok(map_sources(watch))
    }
}

fn map_episodes(info: InfoResponse) -> Vec<Episode> {
    info.episodes
        .into_iter()
        .enumerate()
        .map(|(position, entry)| Episode {
            id: EpisodeId(entry.id),
            number: entry.number.unwrap_or(position as u32 + 1),
        })
        .collect()
}

fn map_sources(watch: WatchResponse) -> Vec<StreamSource> {
    watch
        .sources
        .into_iter()
        .map(|entry| {
            let format = if entry.is_m3u8 {
                StreamFormat::Hls
            } else {
                StreamFormat::from_url(&entry.url)
            };
            StreamSource {
                url: entry.url,
                format,
                quality: entry.quality,
            }
        })
        .collect()
}
