//! Test helpers and fixtures for anistream-core tests
//!
//! Scripted providers, catalogs and sinks shared by unit and integration
//! tests.

use crate::catalog::{CatalogClient, CatalogError};
use crate::model::{
    Episode, EpisodeId, StreamFormat, StreamSource, Title, TitleId, TitleInfo,
};
use crate::provider::{
    ProviderDescriptor, ProviderError, ProviderRegistry, RegisteredProvider, StreamProvider,
};
use crate::resolve::RetryPolicy;
use crate::sink::{PlaybackSink, SinkError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Retry policy that never sleeps, for tests that exercise fallback rather
/// than retry timing.
#[must_use]
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 1,
        delay: Duration::ZERO,
    }
}

/// Scripted provider: `None` for an operation means "fail with a transient
/// network error"; a gate, when set, delays every answer until the test
/// releases a permit.
pub struct MockProvider {
    episodes: Option<Vec<Episode>>,
    sources: Option<Vec<StreamSource>>,
    gate: Option<Arc<Semaphore>>,
    pub episode_calls: AtomicU32,
    pub source_calls: AtomicU32,
}

impl MockProvider {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            episodes: None,
            sources: None,
            gate: None,
            episode_calls: AtomicU32::new(0),
            source_calls: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn with_episodes(episodes: Vec<Episode>) -> Self {
        Self {
            episodes: Some(episodes),
            sources: None,
            gate: None,
            episode_calls: AtomicU32::new(0),
            source_calls: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn with_sources(sources: Vec<StreamSource>) -> Self {
        Self {
            episodes: None,
            sources: Some(sources),
            gate: None,
            episode_calls: AtomicU32::new(0),
            source_calls: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn with_episodes_and_sources(
        episodes: Vec<Episode>,
        sources: Vec<StreamSource>,
    ) -> Self {
        Self {
            episodes: Some(episodes),
            sources: Some(sources),
            gate: None,
            episode_calls: AtomicU32::new(0),
            source_calls: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await;
            permit.map(|p| p.forget()).ok();
        }
    }

    pub fn episode_call_count(&self) -> u32 {
        self.episode_calls.load(Ordering::SeqCst)
    }

    pub fn source_call_count(&self) -> u32 {
        self.source_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamProvider for MockProvider {
    async fn fetch_episodes(&self, _title: TitleId) -> Result<Vec<Episode>, ProviderError> {
        self.episode_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        self.episodes
            .clone()
            .ok_or_else(|| ProviderError::Network("connection refused".to_string()))
    }

    async fn fetch_sources(
        &self,
        _episode: &EpisodeId,
    ) -> Result<Vec<StreamSource>, ProviderError> {
        self.source_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        self.sources
            .clone()
            .ok_or_else(|| ProviderError::Network("connection refused".to_string()))
    }
}

/// Build a registry from providers, generating `provider-{i}` descriptors.
#[must_use]
pub fn registry_of(providers: Vec<Arc<dyn StreamProvider>>) -> ProviderRegistry {
    let entries = providers
        .into_iter()
        .enumerate()
        .map(|(i, provider)| RegisteredProvider {
            descriptor: ProviderDescriptor {
                name: format!("provider-{i}"),
                display_name: format!("Provider {i}"),
                episodes_url: format!("https://api.example.com/{i}/info"),
                watch_url: format!("https://api.example.com/{i}/watch"),
                search_url: Some(format!("https://site-{i}.example.com/search?q=")),
            },
            provider,
        })
        .collect();
    #[allow(clippy::unwrap_used)]
    ProviderRegistry::new(entries).unwrap()
}

/// Catalog stub returning fixed detail and empty listings.
pub struct StaticCatalog {
    info: TitleInfo,
    gate: Option<Arc<Semaphore>>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(info: TitleInfo) -> Self {
        Self { info, gate: None }
    }

    #[must_use]
    pub fn with_hint(hint: Option<u32>) -> Self {
        Self::new(TitleInfo {
            display_name: None,
            description: Some("A test title".to_string()),
            episode_count_hint: hint,
        })
    }

    #[must_use]
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn trending(&self) -> Result<Vec<Title>, CatalogError> {
        Ok(Vec::new())
    }

    async fn popular(&self) -> Result<Vec<Title>, CatalogError> {
        Ok(Vec::new())
    }

    async fn search(&self, _query: &str) -> Result<Vec<Title>, CatalogError> {
        Ok(Vec::new())
    }

    async fn info(&self, _id: TitleId) -> Result<TitleInfo, CatalogError> {
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await;
            permit.map(|p| p.forget()).ok();
        }
        Ok(self.info.clone())
    }
}

/// Sink that records every handoff and fails for configured URLs.
#[derive(Default)]
pub struct RecordingSink {
    played: parking_lot::Mutex<Vec<(String, StreamFormat, String)>>,
    fail_urls: Vec<String>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_for(fail_urls: Vec<String>) -> Self {
        Self {
            played: parking_lot::Mutex::new(Vec::new()),
            fail_urls,
        }
    }

    pub fn played(&self) -> Vec<(String, StreamFormat, String)> {
        self.played.lock().clone()
    }
}

#[async_trait]
impl PlaybackSink for RecordingSink {
    async fn play(
        &self,
        url: &str,
        format: StreamFormat,
        provider_name: &str,
    ) -> Result<(), SinkError> {
        if self.fail_urls.iter().any(|u| u == url) {
            return Err(SinkError(format!("unsupported stream: {url}")));
        }
        self.played
            .lock()
            .push((url.to_string(), format, provider_name.to_string()));
        Ok(())
    }

    async fn stop(&self) {}
}

/// Convenience episode list `ep-1..=ep-n`.
#[must_use]
pub fn episodes(n: u32) -> Vec<Episode> {
    (1..=n)
        .map(|number| Episode {
            id: EpisodeId(format!("ep-{number}")),
            number,
        })
        .collect()
}
