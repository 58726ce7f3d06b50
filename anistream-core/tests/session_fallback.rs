//! End-to-end session scenarios: provider fallback, placeholder
//! synthesis, sink failure handling, retry collapsing and stale
//! completion discard, against scripted providers and a recording sink.

use anistream_core::catalog::{CatalogClient, CatalogError};
use anistream_core::model::{
    EpisodeId, StreamFormat, StreamSource, Title, TitleId, TitleInfo,
};
use anistream_core::session::{PlaybackController, SessionEvent, SessionPhase};
use anistream_core::test_helpers::{
    episodes, fast_policy, registry_of, MockProvider, RecordingSink, StaticCatalog,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

fn title(id: i64, name: &str) -> Title {
    Title {
        id: TitleId(id),
        display_name: name.to_string(),
        episode_count_hint: None,
        cover_art: None,
    }
}

struct FailingCatalog;

#[async_trait]
impl CatalogClient for FailingCatalog {
    async fn trending(&self) -> Result<Vec<Title>, CatalogError> {
        Err(CatalogError::Network("unreachable".to_string()))
    }

    async fn popular(&self) -> Result<Vec<Title>, CatalogError> {
        Err(CatalogError::Network("unreachable".to_string()))
    }

    async fn search(&self, _query: &str) -> Result<Vec<Title>, CatalogError> {
        Err(CatalogError::Network("unreachable".to_string()))
    }

    async fn info(&self, _id: TitleId) -> Result<TitleInfo, CatalogError> {
        Err(CatalogError::Network("unreachable".to_string()))
    }
}

fn controller_with_events(
    providers: Vec<Arc<dyn anistream_core::provider::StreamProvider>>,
    catalog: Arc<dyn CatalogClient>,
    sink: Arc<RecordingSink>,
) -> (PlaybackController, mpsc::UnboundedReceiver<SessionEvent>) {
    let registry = Arc::new(registry_of(providers));
    let mut controller = PlaybackController::new(registry, catalog, sink, fast_policy());
    let (tx, rx) = mpsc::unbounded_channel();
    controller.set_event_sender(tx);
    (controller, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_fallback_to_second_provider_and_default_quality() {
    let sources = vec![
        StreamSource::from_url("https://cdn.example.com/a.mp4", Some("1080p".to_string())),
        StreamSource::from_url(
            "https://cdn.example.com/master.m3u8",
            Some("default".to_string()),
        ),
        StreamSource::from_url("https://cdn.example.com/b.mp4", Some("720p".to_string())),
    ];
    let good = Arc::new(MockProvider::with_episodes_and_sources(
        episodes(2),
        sources,
    ));
    let sink = Arc::new(RecordingSink::new());
    let (controller, mut rx) = controller_with_events(
        vec![Arc::new(MockProvider::failing()), good],
        Arc::new(StaticCatalog::with_hint(Some(2))),
        sink.clone(),
    );

    controller.open_title(title(21, "One Piece")).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(snapshot.provider_index, 1);
    assert_eq!(snapshot.episodes.len(), 2);
    assert!(!snapshot.placeholders);
    assert_eq!(snapshot.current_episode, Some(EpisodeId("ep-1".to_string())));

    let played = sink.played();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].0, "https://cdn.example.com/master.m3u8");
    assert_eq!(played[0].1, StreamFormat::Hls);

    let events = drain(&mut rx);
    assert!(matches!(
        events[0],
        SessionEvent::EpisodesLoaded { count: 2, placeholders: false, .. }
    ));
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::PlaybackStarted { provider, .. } if provider == "Provider 1"
    )));
}

#[tokio::test]
async fn test_placeholders_synthesized_when_every_provider_fails() {
    let sink = Arc::new(RecordingSink::new());
    let (controller, mut rx) = controller_with_events(
        vec![
            Arc::new(MockProvider::failing()),
            Arc::new(MockProvider::failing()),
        ],
        Arc::new(StaticCatalog::with_hint(Some(4))),
        sink.clone(),
    );

    controller.open_title(title(99, "Obscure Show")).await;

    let snapshot = controller.snapshot();
    assert!(snapshot.placeholders);
    assert_eq!(snapshot.episodes.len(), 4);
    assert_eq!(snapshot.episodes[0].id.0, "99-episode-1");
    assert_eq!(snapshot.episodes[3].id.0, "99-episode-4");

    // Source lookup for the synthesized first episode also fails on every
    // provider, so the session ends terminal with the full trail.
    assert_eq!(snapshot.phase, SessionPhase::ErrorTerminal);
    let failure = snapshot.failure.expect("terminal failure");
    assert_eq!(failure.attempts.len(), 2);
    assert!(failure.attempts.iter().all(|a| !a.is_success()));
    assert_eq!(
        failure.external_url,
        "https://site-1.example.com/search?q=Obscure+Show"
    );
    assert!(sink.played().is_empty());

    let events = drain(&mut rx);
    assert!(matches!(
        events[0],
        SessionEvent::EpisodesLoaded { count: 4, placeholders: true, .. }
    ));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::SessionFailed { .. })));
}

#[tokio::test]
async fn test_placeholder_count_defaults_without_hint() {
    let sink = Arc::new(RecordingSink::new());
    let (controller, _rx) = controller_with_events(
        vec![Arc::new(MockProvider::failing())],
        Arc::new(StaticCatalog::with_hint(None)),
        sink,
    );

    controller.open_title(title(7, "Hintless")).await;

    assert_eq!(controller.snapshot().episodes.len(), 12);
}

#[tokio::test]
async fn test_catalog_failure_is_degraded_not_terminal() {
    let good = Arc::new(MockProvider::with_episodes_and_sources(
        episodes(1),
        vec![StreamSource::from_url(
            "https://cdn.example.com/v.m3u8",
            None,
        )],
    ));
    let sink = Arc::new(RecordingSink::new());
    let (controller, _rx) =
        controller_with_events(vec![good], Arc::new(FailingCatalog), sink.clone());

    controller.open_title(title(5, "Still Works")).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert!(snapshot.description.is_none());
    assert_eq!(sink.played().len(), 1);
}

#[tokio::test]
async fn test_catalog_display_name_replaces_synthetic_one() {
    let sink = Arc::new(RecordingSink::new());
    let catalog = Arc::new(StaticCatalog::new(TitleInfo {
        display_name: Some("One Piece".to_string()),
        description: None,
        episode_count_hint: Some(1),
    }));
    let (controller, _rx) =
        controller_with_events(vec![Arc::new(MockProvider::failing())], catalog, sink);

    controller.open_title(Title::from_id(TitleId(21))).await;

    let snapshot = controller.snapshot();
    assert_eq!(
        snapshot.title.as_ref().map(|t| t.display_name.as_str()),
        Some("One Piece")
    );
    // The external-site action searches for the catalog name, not the
    // synthetic id-derived one.
    let failure = snapshot.failure.expect("terminal failure");
    assert_eq!(
        failure.external_url,
        "https://site-0.example.com/search?q=One+Piece"
    );
}

#[tokio::test]
async fn test_empty_provider_result_uses_catalog_hint_for_placeholders() {
    let empty = Arc::new(MockProvider::with_episodes_and_sources(
        Vec::new(),
        vec![StreamSource::from_url(
            "https://cdn.example.com/v.m3u8",
            None,
        )],
    ));
    let sink = Arc::new(RecordingSink::new());
    let (controller, _rx) = controller_with_events(
        vec![empty],
        Arc::new(StaticCatalog::with_hint(Some(3))),
        sink.clone(),
    );

    controller.open_title(title(42, "Sparse")).await;

    let snapshot = controller.snapshot();
    assert!(snapshot.placeholders);
    assert_eq!(snapshot.episodes.len(), 3);
    assert_eq!(snapshot.phase, SessionPhase::Playing);
}

#[tokio::test]
async fn test_sink_failure_falls_back_to_next_provider() {
    let bad_url = "https://cdn.example.com/broken.m3u8";
    let first = Arc::new(MockProvider::with_episodes_and_sources(
        episodes(1),
        vec![StreamSource::from_url(bad_url, None)],
    ));
    let second = Arc::new(MockProvider::with_sources(vec![StreamSource::from_url(
        "https://cdn.example.com/good.mp4",
        None,
    )]));
    let sink = Arc::new(RecordingSink::failing_for(vec![bad_url.to_string()]));
    let (controller, mut rx) = controller_with_events(
        vec![first, second],
        Arc::new(StaticCatalog::with_hint(Some(1))),
        sink.clone(),
    );

    controller.open_title(title(1, "Sinker")).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(snapshot.provider_index, 1);
    // The first provider resolved sources but its stream was rejected by
    // the sink, so its trail entry must read as exhausted.
    assert!(!snapshot.attempts[0].is_success());
    assert!(snapshot.attempts[1].is_success());
    assert_eq!(sink.played()[0].0, "https://cdn.example.com/good.mp4");

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::ProviderFallback { from_provider, .. } if from_provider == "provider-0"
    )));
}

#[tokio::test]
async fn test_source_without_default_prefers_hls_then_mp4() {
    let provider = Arc::new(MockProvider::with_episodes_and_sources(
        episodes(1),
        vec![
            StreamSource::from_url("https://cdn.example.com/stream", Some("1080p".to_string())),
            StreamSource::from_url("https://cdn.example.com/v.mp4", Some("720p".to_string())),
        ],
    ));
    let sink = Arc::new(RecordingSink::new());
    let (controller, _rx) = controller_with_events(
        vec![provider],
        Arc::new(StaticCatalog::with_hint(Some(1))),
        sink.clone(),
    );

    controller.open_title(title(2, "Formats")).await;

    assert_eq!(sink.played()[0].0, "https://cdn.example.com/v.mp4");
    assert_eq!(sink.played()[0].1, StreamFormat::Mp4);
}

#[tokio::test]
async fn test_provider_with_empty_source_list_is_skipped() {
    let empty_sources = Arc::new(MockProvider::with_episodes_and_sources(
        episodes(1),
        Vec::new(),
    ));
    let second = Arc::new(MockProvider::with_sources(vec![StreamSource::from_url(
        "https://cdn.example.com/v.m3u8",
        None,
    )]));
    let sink = Arc::new(RecordingSink::new());
    let (controller, _rx) = controller_with_events(
        vec![empty_sources, second],
        Arc::new(StaticCatalog::with_hint(Some(1))),
        sink.clone(),
    );

    controller.open_title(title(3, "Empty Set")).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(snapshot.provider_index, 1);
    assert_eq!(sink.played()[0].0, "https://cdn.example.com/v.m3u8");
}

#[tokio::test]
async fn test_provider_position_sticky_across_episode_loads() {
    let good = Arc::new(MockProvider::with_episodes_and_sources(
        episodes(3),
        vec![StreamSource::from_url(
            "https://cdn.example.com/v.m3u8",
            None,
        )],
    ));
    let sink = Arc::new(RecordingSink::new());
    let (controller, _rx) = controller_with_events(
        vec![Arc::new(MockProvider::failing()), good.clone()],
        Arc::new(StaticCatalog::with_hint(Some(3))),
        sink.clone(),
    );

    controller.open_title(title(10, "Sticky")).await;
    assert_eq!(controller.snapshot().provider_index, 1);

    controller
        .load_episode(EpisodeId("ep-2".to_string()))
        .await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(snapshot.current_episode, Some(EpisodeId("ep-2".to_string())));
    // The second load starts at the remembered provider, never retrying
    // the one that already failed for this title.
    assert_eq!(snapshot.attempts.len(), 1);
    assert_eq!(snapshot.attempts[0].provider_index, 1);
    assert_eq!(sink.played().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_retry_reopens_title_from_terminal_state() {
    let sink = Arc::new(RecordingSink::new());
    let (controller, mut rx) = controller_with_events(
        vec![Arc::new(MockProvider::failing())],
        Arc::new(StaticCatalog::with_hint(Some(1))),
        sink,
    );

    controller.open_title(title(8, "Flaky")).await;
    assert_eq!(controller.snapshot().phase, SessionPhase::ErrorTerminal);
    drain(&mut rx);

    controller.retry().await;

    // Providers still fail, so the reopened session lands terminal again,
    // but it went through a full reopen.
    assert_eq!(controller.snapshot().phase, SessionPhase::ErrorTerminal);
    let events = drain(&mut rx);
    assert!(matches!(events[0], SessionEvent::RetryScheduled { .. }));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::EpisodesLoaded { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_title_opened_during_retry_delay_wins() {
    let sink = Arc::new(RecordingSink::new());
    let (controller, mut rx) = controller_with_events(
        vec![Arc::new(MockProvider::failing())],
        Arc::new(StaticCatalog::with_hint(Some(1))),
        sink,
    );

    controller.open_title(title(1, "First Pick")).await;
    assert_eq!(controller.snapshot().phase, SessionPhase::ErrorTerminal);
    drain(&mut rx);

    let retrier = tokio::spawn({
        let controller = controller.clone();
        async move { controller.retry().await }
    });
    // Let the retry pass its guard and park on its delay.
    tokio::task::yield_now().await;
    assert!(matches!(
        rx.try_recv(),
        Ok(SessionEvent::RetryScheduled {
            title: TitleId(1)
        })
    ));

    controller.open_title(title(2, "Second Pick")).await;
    retrier.await.expect("retry task");

    // The delayed retry must not re-open the first title over the newer
    // session.
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.title.as_ref().map(|t| t.id), Some(TitleId(2)));
    assert!(drain(&mut rx).iter().all(|e| !matches!(
        e,
        SessionEvent::EpisodesLoaded {
            title: TitleId(1),
            ..
        }
    )));
}

#[tokio::test]
async fn test_retry_is_noop_outside_terminal_and_playing() {
    let sink = Arc::new(RecordingSink::new());
    let (controller, mut rx) = controller_with_events(
        vec![Arc::new(MockProvider::failing())],
        Arc::new(StaticCatalog::with_hint(None)),
        sink,
    );

    controller.retry().await;

    assert_eq!(controller.snapshot().phase, SessionPhase::Idle);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_load_episode_ignored_while_resolution_in_flight() {
    let gate = Arc::new(Semaphore::new(1));
    let provider = Arc::new(
        MockProvider::with_episodes_and_sources(
            episodes(2),
            vec![StreamSource::from_url(
                "https://cdn.example.com/v.m3u8",
                None,
            )],
        )
        .gated(gate.clone()),
    );
    let sink = Arc::new(RecordingSink::new());
    let (controller, _rx) = controller_with_events(
        vec![provider.clone()],
        Arc::new(StaticCatalog::with_hint(Some(2))),
        sink.clone(),
    );

    let opener = tokio::spawn({
        let controller = controller.clone();
        async move { controller.open_title(title(6, "Busy")).await }
    });
    // Let the open consume the single permit on the episode fetch and park
    // on the gated source fetch.
    while provider.source_call_count() == 0 {
        tokio::task::yield_now().await;
    }

    controller
        .load_episode(EpisodeId("ep-2".to_string()))
        .await;
    assert_eq!(provider.source_call_count(), 1);

    gate.add_permits(1);
    opener.await.expect("open task");

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(snapshot.current_episode, Some(EpisodeId("ep-1".to_string())));
    assert_eq!(sink.played().len(), 1);
}

#[tokio::test]
async fn test_stale_title_open_is_discarded() {
    let gate = Arc::new(Semaphore::new(0));
    let catalog = Arc::new(StaticCatalog::with_hint(Some(1)).gated(gate.clone()));
    let provider = Arc::new(MockProvider::with_episodes_and_sources(
        episodes(1),
        vec![StreamSource::from_url(
            "https://cdn.example.com/v.m3u8",
            None,
        )],
    ));
    let sink = Arc::new(RecordingSink::new());
    let (controller, _rx) = controller_with_events(vec![provider], catalog, sink.clone());

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.open_title(title(1, "First Pick")).await }
    });
    tokio::task::yield_now().await;
    let second = tokio::spawn({
        let controller = controller.clone();
        async move { controller.open_title(title(2, "Second Pick")).await }
    });
    tokio::task::yield_now().await;

    // Both opens are parked at the catalog; release them in request order.
    // The first completes its catalog call only to find its session
    // superseded and must leave no trace.
    gate.add_permits(2);
    first.await.expect("first open task");
    second.await.expect("second open task");

    let snapshot = controller.snapshot();
    assert_eq!(
        snapshot.title.as_ref().map(|t| t.id),
        Some(TitleId(2))
    );
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(sink.played().len(), 1);
}

#[tokio::test]
async fn test_close_returns_to_idle() {
    let provider = Arc::new(MockProvider::with_episodes_and_sources(
        episodes(1),
        vec![StreamSource::from_url(
            "https://cdn.example.com/v.m3u8",
            None,
        )],
    ));
    let sink = Arc::new(RecordingSink::new());
    let (controller, mut rx) = controller_with_events(
        vec![provider],
        Arc::new(StaticCatalog::with_hint(Some(1))),
        sink,
    );

    controller.open_title(title(4, "Done")).await;
    assert_eq!(controller.snapshot().phase, SessionPhase::Playing);

    controller.close().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert!(snapshot.title.is_none());
    assert!(snapshot.episodes.is_empty());
    assert!(drain(&mut rx)
        .iter()
        .any(|e| matches!(e, SessionEvent::SessionClosed)));
}
