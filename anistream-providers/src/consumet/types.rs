//! Wire types for Consumet-style provider APIs.
//!
//! Only the fields the resolver consumes are modeled; providers attach
//! plenty of extra metadata that is ignored on deserialization.

use serde::Deserialize;

/// `/info` response: the episode catalog.
#[derive(Debug, Deserialize)]
pub struct InfoResponse {
    #[serde(default)]
    pub episodes: Vec<EpisodeEntry>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeEntry {
    pub id: String,
    /// Some providers omit the ordinal; the adapter falls back to the
    /// list position.
    #[serde(default)]
    pub number: Option<u32>,
}

/// `/watch` response: the candidate stream set for one episode.
#[derive(Debug, Deserialize)]
pub struct WatchResponse {
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SourceEntry {
    pub url: String,
    #[serde(default)]
    pub quality: Option<String>,
    /// Wire-declared container hint; the URL suffix is still consulted
    /// when this is absent or false.
    #[serde(default, rename = "isM3U8")]
    pub is_m3u8: bool,
}
