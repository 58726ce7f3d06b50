//! Resolution engine: bounded retry per provider, ordered cross-provider
//! fallback, attempt bookkeeping, and canonical source selection.

mod episodes;
mod retry;
mod select;
mod sources;

pub use episodes::resolve_episodes;
pub use retry::{retry, RetryExhausted, RetryPolicy, TransientError};
pub use select::select_best_source;
pub use sources::resolve_sources;

use crate::model::AttemptRecord;

/// Successful resolution: the value, the provider that produced it, and
/// the full attempt trail (one record per provider tried, including the
/// final success).
#[derive(Debug)]
pub struct Resolution<T> {
    pub value: T,
    /// 0-based registry position of the provider that answered.
    pub provider_index: usize,
    pub attempts: Vec<AttemptRecord>,
}

/// Every provider in the walk was exhausted for the current stage.
///
/// Carries the complete per-provider attempt trail for diagnostic display.
#[derive(Debug, thiserror::Error)]
#[error("all providers failed ({} attempted)", attempts.len())]
pub struct AllProvidersFailed {
    pub attempts: Vec<AttemptRecord>,
}
