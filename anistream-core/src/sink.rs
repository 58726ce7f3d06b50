//! Playback sink boundary.
//!
//! The decode/playback surface is an opaque collaborator: it accepts one
//! resolved source and either starts playing or reports an error. Codec
//! support is the sink's concern; a sink failure takes the same
//! per-episode provider-fallback path as a resolution failure.

use crate::model::StreamFormat;
use async_trait::async_trait;

/// Opaque playback surface.
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    /// Hand off one resolved source for playback.
    async fn play(
        &self,
        url: &str,
        format: StreamFormat,
        provider_name: &str,
    ) -> Result<(), SinkError>;

    /// Tear down any playback resource currently held.
    async fn stop(&self);
}

/// The sink failed after a source was handed off.
#[derive(Debug, thiserror::Error)]
#[error("playback failed: {0}")]
pub struct SinkError(pub String);
