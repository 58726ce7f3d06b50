//! Catalog metadata collaborator boundary.
//!
//! The catalog is a stateless read: search, trending/popular listings and
//! per-title detail. It has no retry and no provider fallback; a catalog
//! failure only degrades presentation, it never blocks stream resolution.

use crate::model::{Title, TitleId, TitleInfo};
use async_trait::async_trait;

/// Read-only metadata source for titles.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn trending(&self) -> Result<Vec<Title>, CatalogError>;

    async fn popular(&self) -> Result<Vec<Title>, CatalogError>;

    async fn search(&self, query: &str) -> Result<Vec<Title>, CatalogError>;

    /// Detail for one title: description and episode-count hint.
    async fn info(&self, id: TitleId) -> Result<TitleInfo, CatalogError>;
}

/// Catalog read failure.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}")]
    Http(u16),

    #[error("Catalog API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
