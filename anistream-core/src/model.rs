//! Core data model shared across the resolution engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality label sentinel marking a provider's preferred source.
pub const DEFAULT_QUALITY: &str = "default";

/// Stable external identifier for a title, assigned by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TitleId(pub i64);

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of media (a series) as described by the catalog.
///
/// Created by the catalog collaborator; read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub id: TitleId,
    /// Display name, preferring the localized form over the canonical one.
    pub display_name: String,
    /// Total episode count as reported by the catalog, if known.
    pub episode_count_hint: Option<u32>,
    pub cover_art: Option<String>,
}

impl Title {
    /// Minimal title for lookups where only the identifier is known.
    #[must_use]
    pub fn from_id(id: TitleId) -> Self {
        Self {
            id,
            display_name: format!("Title {id}"),
            episode_count_hint: None,
            cover_art: None,
        }
    }
}

/// Per-title detail returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleInfo {
    /// Catalog-authoritative display name, replacing any synthetic one
    /// the caller opened the title with.
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub episode_count_hint: Option<u32>,
}

/// Opaque per-provider episode identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeId(pub String);

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One playable unit within a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    /// Ordinal episode number, 1-based.
    pub number: u32,
}

impl Episode {
    /// Synthesize a placeholder episode sequence for a title whose
    /// providers returned no episode catalog.
    ///
    /// Identifiers follow the `{title_id}-episode-{n}` convention that
    /// source lookup understands. Placeholders are never mixed with real
    /// episodes for the same session.
    #[must_use]
    pub fn placeholders(title_id: TitleId, count: u32) -> Vec<Self> {
        (1..=count)
            .map(|number| Self {
                id: EpisodeId(format!("{title_id}-episode-{number}")),
                number,
            })
            .collect()
    }
}

/// Stream container format, derived from the URL rather than any
/// provider-declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    /// Segmented manifest (`.m3u8`).
    Hls,
    /// Direct file (`.mp4`).
    Mp4,
    Other,
}

impl StreamFormat {
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        if url.contains(".m3u8") {
            Self::Hls
        } else if url.contains(".mp4") {
            Self::Mp4
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hls => "hls",
            Self::Mp4 => "mp4",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A playable URL plus format and quality metadata, from one provider for
/// one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSource {
    pub url: String,
    pub format: StreamFormat,
    pub quality: Option<String>,
}

impl StreamSource {
    /// Build a source from a provider URL, deriving the format from the
    /// URL suffix.
    #[must_use]
    pub fn from_url(url: impl Into<String>, quality: Option<String>) -> Self {
        let url = url.into();
        let format = StreamFormat::from_url(&url);
        Self { url, format, quality }
    }

    /// Whether the provider labeled this source with the "default"
    /// quality sentinel.
    #[must_use]
    pub fn is_default_quality(&self) -> bool {
        self.quality.as_deref() == Some(DEFAULT_QUALITY)
    }
}

/// Outcome of one provider position in a resolution walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    /// The provider gave up after exhausting its retry budget (or failed
    /// with a non-transient error).
    Exhausted { error: String },
}

/// One entry in the per-resolution attempt trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 0-based position in the provider registry.
    pub provider_index: usize,
    pub provider_name: String,
    pub outcome: AttemptOutcome,
}

impl AttemptRecord {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_episode_ids() {
        let episodes = Episode::placeholders(TitleId(21), 3);
        assert_eq!(episodes.len(), 3);
        assert_eq!(episodes[0].id.0, "21-episode-1");
        assert_eq!(episodes[2].id.0, "21-episode-3");
        assert_eq!(episodes[2].number, 3);
    }

    #[test]
    fn test_placeholder_zero_count() {
        assert!(Episode::placeholders(TitleId(1), 0).is_empty());
    }

    #[test]
    fn test_format_from_url() {
        assert_eq!(
            StreamFormat::from_url("https://cdn.example.com/ep1/index.m3u8"),
            StreamFormat::Hls
        );
        assert_eq!(
            StreamFormat::from_url("https://cdn.example.com/ep1.mp4?token=x"),
            StreamFormat::Mp4
        );
        assert_eq!(
            StreamFormat::from_url("https://cdn.example.com/ep1/stream"),
            StreamFormat::Other
        );
    }

    #[test]
    fn test_default_quality_sentinel() {
        let source = StreamSource::from_url("https://a/v.mp4", Some("default".to_string()));
        assert!(source.is_default_quality());

        let source = StreamSource::from_url("https://a/v.mp4", Some("1080p".to_string()));
        assert!(!source.is_default_quality());

        let source = StreamSource::from_url("https://a/v.mp4", None);
        assert!(!source.is_default_quality());
    }
}
