//! Source resolution: same walk discipline as episode resolution, scoped
//! to one episode.

use super::{retry, AllProvidersFailed, Resolution, RetryPolicy};
use crate::model::{AttemptOutcome, AttemptRecord, EpisodeId, StreamSource};
use crate::provider::ProviderRegistry;

/// Resolve the playable sources for one episode, starting at `start_index`
/// and advancing on provider exhaustion.
///
/// Every source in a success comes from the single provider at the
/// returned index; result sets are never merged across providers. An
/// empty source list is still a valid success here; whether it is
/// playable is the source selector's call.
pub async fn resolve_sources(
    registry: &ProviderRegistry,
    policy: RetryPolicy,
    episode: &EpisodeId,
    start_index: usize,
) -> Result<Resolution<Vec<StreamSource>>, AllProvidersFailed> {
    let mut attempts = Vec::new();

    for index in start_index..registry.len() {
        let Some(entry) = registry.get(index) else {
            break;
        };
        let name = entry.descriptor.name.clone();
        let description = format!("source lookup via {name}");

        match retry(policy, &description, || entry.provider.fetch_sources(episode)).await {
            Ok(sources) => {
                tracing::info!(
                    provider = %name,
                    provider_index = index,
                    episode = %episode,
                    count = sources.len(),
                    "stream sources resolved"
                );
                attempts.push(AttemptRecord {
                    provider_index: index,
                    provider_name: name,
                    outcome: AttemptOutcome::Success,
                });
                return Ok(Resolution {
                    value: sources,
                    provider_index: index,
                    attempts,
                });
            }
            Err(exhausted) => {
                tracing::warn!(
                    provider = %name,
                    provider_index = index,
                    episode = %episode,
                    error = %exhausted,
                    "provider exhausted, advancing to next"
                );
                attempts.push(AttemptRecord {
                    provider_index: index,
                    provider_name: name,
                    outcome: AttemptOutcome::Exhausted {
                        error: exhausted.last_error.to_string(),
                    },
                });
            }
        }
    }

    Err(AllProvidersFailed { attempts })
}
