// Stream Provider Trait
//
// Core interface every content provider implements.

use super::ProviderError;
use crate::model::{Episode, EpisodeId, StreamSource, TitleId};
use async_trait::async_trait;

/// A content provider capable of listing a title's episodes and returning
/// playable sources for one episode.
///
/// Both calls are single attempts with no retry of their own; bounded
/// retry and cross-provider fallback live in `crate::resolve`.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Fetch the ordered episode list for a title.
    ///
    /// An empty list is a valid response, distinct from failure: it means
    /// the provider knows the title but carries no episode catalog.
    async fn fetch_episodes(&self, title: TitleId) -> Result<Vec<Episode>, ProviderError>;

    /// Fetch the playable sources for one episode.
    ///
    /// The returned list is unordered and comes verbatim from this single
    /// provider; callers never merge source lists across providers.
    async fn fetch_sources(&self, episode: &EpisodeId) -> Result<Vec<StreamSource>, ProviderError>;
}
