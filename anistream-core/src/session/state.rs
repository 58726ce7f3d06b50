//! Session state, owned and mutated only by the controller.

use crate::model::{AttemptRecord, Episode, EpisodeId, Title};

/// Lifecycle phase of one playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    TitleLoading,
    EpisodesReady,
    EpisodeLoading,
    Playing,
    /// A user-initiated retry is waiting out its delay before re-entering
    /// `TitleLoading`.
    Retrying,
    ErrorTerminal,
}

/// Aggregated failure exposed when every provider has been exhausted:
/// the complete attempt trail plus the external-site fallback action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalFailure {
    pub attempts: Vec<AttemptRecord>,
    /// "Open external site" action: the last-tried provider's search page
    /// for the current title, or a generic web search.
    pub external_url: String,
}

/// Mutable state of one session. Created on title open, discarded on
/// close or on the next title open. Nothing outside the controller holds
/// a reference to it.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) phase: SessionPhase,
    pub(crate) title: Option<Title>,
    pub(crate) description: Option<String>,
    pub(crate) episodes: Vec<Episode>,
    /// True when `episodes` is a synthesized placeholder sequence.
    pub(crate) placeholders: bool,
    pub(crate) current_episode: Option<EpisodeId>,
    /// 0-based position into the provider registry; sticky across
    /// episodes of one title unless a fallback moved it.
    pub(crate) provider_index: usize,
    pub(crate) attempts: Vec<AttemptRecord>,
    pub(crate) failure: Option<TerminalFailure>,
    /// Guards against overlapping resolution calls for this session.
    pub(crate) is_retrying: bool,
    /// Bumped on every title open and episode selection; async completions
    /// carrying an older generation are stale and must be discarded.
    pub(crate) generation: u64,
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl SessionState {
    /// Replace the session wholesale for a newly opened title, preserving
    /// the generation monotonicity.
    pub(crate) fn reset_for(&mut self, title: Title) {
        *self = Self {
            phase: SessionPhase::TitleLoading,
            title: Some(title),
            generation: self.generation + 1,
            ..Self::default()
        };
    }

    /// Tear down to idle, keeping generations monotonic so in-flight
    /// completions from before the close stay stale.
    pub(crate) fn reset_to_idle(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            title: self.title.clone(),
            description: self.description.clone(),
            episodes: self.episodes.clone(),
            placeholders: self.placeholders,
            current_episode: self.current_episode.clone(),
            provider_index: self.provider_index,
            attempts: self.attempts.clone(),
            failure: self.failure.clone(),
        }
    }
}

/// Read-only view of the session for presentation layers.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub title: Option<Title>,
    pub description: Option<String>,
    pub episodes: Vec<Episode>,
    pub placeholders: bool,
    pub current_episode: Option<EpisodeId>,
    pub provider_index: usize,
    pub attempts: Vec<AttemptRecord>,
    pub failure: Option<TerminalFailure>,
}
