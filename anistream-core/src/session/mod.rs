//! Playback session: the controller owning all mutable session state and
//! driving episode resolution, source resolution, source selection and the
//! playback sink, with cross-provider fallback and failure aggregation.

mod controller;
mod events;
mod state;

pub use controller::PlaybackController;
pub use events::SessionEvent;
pub use state::{SessionPhase, SessionSnapshot, TerminalFailure};
