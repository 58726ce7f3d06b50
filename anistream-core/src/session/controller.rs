//! Playback session controller.
//!
//! Owns the session state machine and drives catalog lookup, episode
//! resolution, per-episode source resolution with cross-provider fallback,
//! source selection and the playback sink. Every await re-validates the
//! session generation afterwards, so a stale completion landing after a
//! newer selection is silently discarded instead of overwriting it.

use super::events::SessionEvent;
use super::state::{SessionPhase, SessionSnapshot, SessionState, TerminalFailure};
use crate::catalog::CatalogClient;
use crate::error::Error;
use crate::model::{AttemptOutcome, Episode, EpisodeId, Title};
use crate::provider::{ProviderDescriptor, ProviderRegistry};
use crate::resolve::{resolve_episodes, resolve_sources, select_best_source, RetryPolicy};
use crate::sink::PlaybackSink;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Placeholder count when neither the catalog nor the title carries an
/// episode-count hint.
const DEFAULT_EPISODE_COUNT: u32 = 12;

/// Delay before a user-initiated retry re-enters title loading.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Session controller. Cheap to clone; all clones share one session.
///
/// The state lock is never held across an await.
#[derive(Clone)]
pub struct PlaybackController {
    registry: Arc<ProviderRegistry>,
    catalog: Arc<dyn CatalogClient>,
    sink: Arc<dyn PlaybackSink>,
    policy: RetryPolicy,
    state: Arc<Mutex<SessionState>>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("providers", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl PlaybackController {
    #[must_use]
    pub fn new(
        registry: Arc<ProviderRegistry>,
        catalog: Arc<dyn CatalogClient>,
        sink: Arc<dyn PlaybackSink>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            catalog,
            sink,
            policy,
            state: Arc::new(Mutex::new(SessionState::default())),
            events: None,
        }
    }

    /// Attach an event channel for a presentation layer.
    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<SessionEvent>) {
        self.events = Some(sender);
    }

    /// Read-only view of the current session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().snapshot()
    }

    /// Open a title: reset the session, fetch catalog detail, resolve the
    /// episode list from the highest-priority provider, then auto-load the
    /// first episode.
    ///
    /// Episode resolution failure is degraded, not terminal: a placeholder
    /// episode sequence is synthesized (providers frequently omit episode
    /// catalogs while stream lookup by synthesized id still succeeds).
    pub async fn open_title(&self, title: Title) {
        let generation = {
            let mut state = self.state.lock();
            state.reset_for(title.clone());
            state.generation
        };
        tracing::info!(title = %title.id, name = %title.display_name, "opening title");

        let info = match self.catalog.info(title.id).await {
            Ok(info) => Some(info),
            Err(err) => {
                tracing::warn!(
                    title = %title.id,
                    error = %err,
                    "catalog detail unavailable, continuing degraded"
                );
                None
            }
        };
        if !self.is_current(generation) {
            tracing::debug!(title = %title.id, "stale catalog detail discarded");
            return;
        }
        let hint = info
            .as_ref()
            .and_then(|i| i.episode_count_hint)
            .or(title.episode_count_hint);
        if let Some(info) = info {
            let mut state = self.state.lock();
            if let Some(name) = info.display_name {
                if let Some(stored) = state.title.as_mut() {
                    stored.display_name = name;
                }
            }
            state.description = info.description;
        }

        let placeholder_count = hint.unwrap_or(DEFAULT_EPISODE_COUNT).max(1);
        let first_episode = match resolve_episodes(&self.registry, self.policy, title.id, 0).await
        {
            Ok(resolution) => {
                if !self.is_current(generation) {
                    tracing::debug!(title = %title.id, "stale episode resolution discarded");
                    return;
                }
                let mut state = self.state.lock();
                state.provider_index = resolution.provider_index;
                state.attempts = resolution.attempts;
                if resolution.value.is_empty() {
                    state.episodes = Episode::placeholders(title.id, placeholder_count);
                    state.placeholders = true;
                } else {
                    state.episodes = resolution.value;
                    state.placeholders = false;
                }
                state.phase = SessionPhase::EpisodesReady;
                state.episodes.first().map(|e| e.id.clone())
            }
            Err(failed) => {
                if !self.is_current(generation) {
                    tracing::debug!(title = %title.id, "stale episode resolution discarded");
                    return;
                }
                tracing::warn!(
                    title = %title.id,
                    error = %failed,
                    "no provider returned episodes, synthesizing placeholders"
                );
                let mut state = self.state.lock();
                state.attempts = failed.attempts;
                state.provider_index = 0;
                state.episodes = Episode::placeholders(title.id, placeholder_count);
                state.placeholders = true;
                state.phase = SessionPhase::EpisodesReady;
                state.episodes.first().map(|e| e.id.clone())
            }
        };

        let (count, placeholders) = {
            let state = self.state.lock();
            (state.episodes.len(), state.placeholders)
        };
        self.emit(SessionEvent::EpisodesLoaded {
            title: title.id,
            count,
            placeholders,
        });

        if let Some(episode) = first_episode {
            self.load_episode(episode).await;
        }
    }

    /// Resolve and play one episode, starting at the session's current
    /// provider and falling back per-episode across the remaining ones.
    ///
    /// A call while a resolution is already in flight for this session is
    /// a no-op.
    pub async fn load_episode(&self, episode: EpisodeId) {
        let (generation, start_index) = {
            let mut state = self.state.lock();
            if state.is_retrying {
                tracing::debug!(episode = %episode, "resolution already in flight, ignoring");
                return;
            }
            state.is_retrying = true;
            state.generation += 1;
            state.current_episode = Some(episode.clone());
            state.phase = SessionPhase::EpisodeLoading;
            state.failure = None;
            (state.generation, state.provider_index)
        };

        self.resolve_and_play(&episode, start_index, generation).await;

        let mut state = self.state.lock();
        if state.generation == generation {
            state.is_retrying = false;
        }
    }

    async fn resolve_and_play(&self, episode: &EpisodeId, start_index: usize, generation: u64) {
        let mut attempts = Vec::new();
        let mut index = start_index;

        while index < self.registry.len() {
            match resolve_sources(&self.registry, self.policy, episode, index).await {
                Ok(resolution) => {
                    if !self.is_current(generation) {
                        tracing::debug!(episode = %episode, "stale source resolution discarded");
                        return;
                    }
                    let provider_index = resolution.provider_index;
                    let (provider_name, display_name) = self
                        .registry
                        .descriptor(provider_index)
                        .map(|d| (d.name.clone(), d.display_name.clone()))
                        .unwrap_or_default();
                    attempts.extend(resolution.attempts);

                    let failure_reason = match select_best_source(&resolution.value) {
                        Some(source) => {
                            let played = self
                                .sink
                                .play(&source.url, source.format, &display_name)
                                .await;
                            if !self.is_current(generation) {
                                tracing::debug!(episode = %episode, "stale playback handoff discarded");
                                return;
                            }
                            match played {
                                Ok(()) => {
                                    {
                                        let mut state = self.state.lock();
                                        state.provider_index = provider_index;
                                        state.attempts = attempts.clone();
                                        state.failure = None;
                                        state.phase = SessionPhase::Playing;
                                    }
                                    tracing::info!(
                                        episode = %episode,
                                        provider = %provider_name,
                                        url = %source.url,
                                        "playback started"
                                    );
                                    self.emit(SessionEvent::PlaybackStarted {
                                        episode: episode.clone(),
                                        provider: display_name,
                                        url: source.url.clone(),
                                        format: source.format,
                                    });
                                    return;
                                }
                                Err(err) => format!("playback sink: {err}"),
                            }
                        }
                        None => Error::NoPlayableSource(episode.clone()).to_string(),
                    };

                    // The resolver recorded a success for this provider, but
                    // the stream it produced was unusable; rewrite the
                    // trailing record before moving on.
                    if let Some(last) = attempts.last_mut() {
                        if last.is_success() {
                            last.outcome = AttemptOutcome::Exhausted {
                                error: failure_reason.clone(),
                            };
                        }
                    }
                    tracing::warn!(
                        episode = %episode,
                        provider = %provider_name,
                        error = %failure_reason,
                        "stream unusable, falling back"
                    );
                    if let Some(next) = self.registry.descriptor(provider_index + 1) {
                        self.emit(SessionEvent::ProviderFallback {
                            episode: episode.clone(),
                            from_provider: provider_name,
                            to_provider: next.name.clone(),
                        });
                    }
                    index = provider_index + 1;
                }
                Err(failed) => {
                    attempts.extend(failed.attempts);
                    index = self.registry.len();
                }
            }
        }

        if !self.is_current(generation) {
            tracing::debug!(episode = %episode, "stale terminal failure discarded");
            return;
        }
        let title_name = {
            let state = self.state.lock();
            state
                .title
                .as_ref()
                .map(|t| t.display_name.clone())
                .unwrap_or_default()
        };
        let last_descriptor = attempts
            .last()
            .and_then(|a| self.registry.descriptor(a.provider_index));
        let external_url = external_search_url(last_descriptor, &title_name);

        tracing::error!(
            episode = %episode,
            attempted = attempts.len(),
            "all providers exhausted for episode"
        );
        {
            let mut state = self.state.lock();
            state.attempts = attempts.clone();
            state.failure = Some(TerminalFailure {
                attempts: attempts.clone(),
                external_url: external_url.clone(),
            });
            state.phase = SessionPhase::ErrorTerminal;
        }
        self.emit(SessionEvent::SessionFailed {
            attempts,
            external_url,
        });
    }

    /// User-initiated retry: valid from the terminal failure state or
    /// during playback. Concurrent retries collapse into one.
    pub async fn retry(&self) {
        let (title, generation) = {
            let mut state = self.state.lock();
            if state.is_retrying {
                tracing::debug!("retry already in progress, collapsing");
                return;
            }
            if !matches!(
                state.phase,
                SessionPhase::ErrorTerminal | SessionPhase::Playing
            ) {
                tracing::debug!(phase = ?state.phase, "retry ignored in current phase");
                return;
            }
            let Some(title) = state.title.clone() else {
                return;
            };
            state.is_retrying = true;
            state.phase = SessionPhase::Retrying;
            (title, state.generation)
        };

        self.emit(SessionEvent::RetryScheduled { title: title.id });
        tokio::time::sleep(RETRY_DELAY).await;
        // A title opened (or the session closed) during the delay bumped
        // the generation; that session wins and the retry is dropped.
        if !self.is_current(generation) {
            tracing::debug!(title = %title.id, "stale retry discarded");
            return;
        }
        // open_title resets the session wholesale, clearing the guard.
        self.open_title(title).await;
    }

    /// Tear down playback and return to idle.
    pub async fn close(&self) {
        self.sink.stop().await;
        self.state.lock().reset_to_idle();
        self.emit(SessionEvent::SessionClosed);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(sender) = &self.events {
            sender.send(event).ok();
        }
    }
}

/// External-site fallback URL: the last-tried provider's search page for
/// the title, or a generic web search.
fn external_search_url(descriptor: Option<&ProviderDescriptor>, title_name: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(title_name.as_bytes()).collect();
    descriptor
        .and_then(|d| d.search_url.as_deref())
        .map_or_else(
            || format!("https://www.google.com/search?q={encoded}"),
            |prefix| format!("{prefix}{encoded}"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(search_url: Option<&str>) -> ProviderDescriptor {
        ProviderDescriptor {
            name: "animefox".to_string(),
            display_name: "AnimeFox".to_string(),
            episodes_url: "https://api.example.com/info".to_string(),
            watch_url: "https://api.example.com/watch".to_string(),
            search_url: search_url.map(str::to_string),
        }
    }

    #[test]
    fn test_external_url_uses_provider_search_locator() {
        let d = descriptor(Some("https://animefox.tv/search?q="));
        let url = external_search_url(Some(&d), "My Hero");
        assert_eq!(url, "https://animefox.tv/search?q=My+Hero");
    }

    #[test]
    fn test_external_url_generic_fallback() {
        let d = descriptor(None);
        assert_eq!(
            external_search_url(Some(&d), "My Hero"),
            "https://www.google.com/search?q=My+Hero"
        );
        assert_eq!(
            external_search_url(None, "My Hero"),
            "https://www.google.com/search?q=My+Hero"
        );
    }
}
