//! Core error taxonomy.
//!
//! Transient errors never leave the retry wrapper and per-provider
//! exhaustion never leaves the resolvers; what remains here is what can
//! actually surface. Nothing in the core is fatal to the process; every
//! failure resolves to a terminal session state offering manual retry.

use crate::catalog::CatalogError;
use crate::model::EpisodeId;
use crate::resolve::AllProvidersFailed;
use crate::sink::SinkError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid static configuration (e.g. an empty provider registry).
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Every provider was exhausted for the current resolution stage.
    #[error(transparent)]
    AllProvidersFailed(#[from] AllProvidersFailed),

    /// Sources were returned but none matched the selection policy.
    /// Surfaced with the same weight as `AllProvidersFailed`.
    #[error("no playable source for episode {0}")]
    NoPlayableSource(EpisodeId),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

pub type Result<T> = std::result::Result<T, Error>;
