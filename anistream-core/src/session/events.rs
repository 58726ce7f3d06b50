//! Events emitted by the controller for a presentation layer to subscribe
//! to. Delivery is fire-and-forget: a missing or dropped receiver never
//! blocks resolution.

use crate::model::{AttemptRecord, EpisodeId, StreamFormat, TitleId};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The episode list for the opened title is ready (real or
    /// synthesized placeholders).
    EpisodesLoaded {
        title: TitleId,
        count: usize,
        placeholders: bool,
    },

    /// A source was handed to the playback sink and accepted.
    PlaybackStarted {
        episode: EpisodeId,
        provider: String,
        url: String,
        format: StreamFormat,
    },

    /// The current provider was given up on for this episode; resolution
    /// continues with the next one.
    ProviderFallback {
        episode: EpisodeId,
        from_provider: String,
        to_provider: String,
    },

    /// A user-initiated retry was accepted and is waiting out its delay.
    RetryScheduled { title: TitleId },

    /// Every provider was exhausted; the session is terminal until a
    /// retry or a new title open.
    SessionFailed {
        attempts: Vec<AttemptRecord>,
        external_url: String,
    },

    SessionClosed,
}
