//! Episode resolution: walk the provider registry in priority order until
//! one provider returns an episode list.

use super::{retry, AllProvidersFailed, Resolution, RetryPolicy};
use crate::model::{AttemptOutcome, AttemptRecord, Episode, TitleId};
use crate::provider::ProviderRegistry;

/// Resolve the episode list for a title, starting at `start_index` in the
/// registry and advancing on provider exhaustion.
///
/// Returns on the first provider success; an empty episode list is a
/// valid success, distinct from failure. The returned `provider_index`
/// becomes the caller's new current provider. A success at position `k`
/// carries `k + 1` attempt records (the failures plus the success).
pub async fn resolve_episodes(
    registry: &ProviderRegistry,
    policy: RetryPolicy,
    title: TitleId,
    start_index: usize,
) -> Result<Resolution<Vec<Episode>>, AllProvidersFailed> {
    let mut attempts = Vec::new();

    for index in start_index..registry.len() {
        let Some(entry) = registry.get(index) else {
            break;
        };
        let name = entry.descriptor.name.clone();
        let description = format!("episode lookup via {name}");

        match retry(policy, &description, || entry.provider.fetch_episodes(title)).await {
            Ok(episodes) => {
                tracing::info!(
                    provider = %name,
                    provider_index = index,
                    count = episodes.len(),
                    "episode list resolved"
                );
                attempts.push(AttemptRecord {
                    provider_index: index,
                    provider_name: name,
                    outcome: AttemptOutcome::Success,
                });
                return Ok(Resolution {
                    value: episodes,
                    provider_index: index,
                    attempts,
                });
            }
            Err(exhausted) => {
                tracing::warn!(
                    provider = %name,
                    provider_index = index,
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
