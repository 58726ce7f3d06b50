//! Playback handoff for the command line: prints the resolved stream
//! instead of embedding a player.

use anistream_core::model::StreamFormat;
use anistream_core::sink::{PlaybackSink, SinkError};
use async_trait::async_trait;

/// Sink that hands the stream URL to the terminal. Launching an actual
/// player (mpv, vlc) is the user's side of the handoff.
pub struct HandoffSink;

#[async_trait]
impl PlaybackSink for HandoffSink {
    async fn play(
        &self,
        url: &str,
        format: StreamFormat,
        provider_name: &str,
    ) -> Result<(), SinkError> {
        tracing::info!(provider = provider_name, %format, "stream resolved");
        println!("[{provider_name}] {format}: {url}");
        Ok(())
    }

    async fn stop(&self) {}
}
