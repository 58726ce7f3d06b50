// Provider Registry
//
// Static ordered list of content providers; order encodes fallback
// priority. Built once at startup, never mutated.

use super::StreamProvider;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Static identity and capability endpoints of one content provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Stable name used for position lookup and logging.
    pub name: String,
    /// Human-facing name shown next to playback.
    pub display_name: String,
    /// Episode-list lookup endpoint base.
    pub episodes_url: String,
    /// Stream-source lookup endpoint base.
    pub watch_url: String,
    /// External search page prefix, used for the "open external site"
    /// fallback action when every provider is exhausted.
    pub search_url: Option<String>,
}

/// One registry slot: descriptor plus the client implementing it.
#[derive(Clone)]
pub struct RegisteredProvider {
    pub descriptor: ProviderDescriptor,
    pub provider: Arc<dyn StreamProvider>,
}

impl std::fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Ordered provider sequence. Index 0 is the highest-priority provider.
#[derive(Debug)]
pub struct ProviderRegistry {
    providers: Vec<RegisteredProvider>,
}

impl ProviderRegistry {
    /// Build a registry from an ordered provider list.
    ///
    /// Rejects an empty list: resolution over zero providers can never
    /// succeed, so this is caught at construction rather than at runtime.
    pub fn new(providers: Vec<RegisteredProvider>) -> crate::Result<Self> {
        if providers.is_empty() {
            return Err(Error::Configuration(
                "provider registry must not be empty".to_string(),
            ));
        }
        Ok(Self { providers })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Always false: an empty registry is rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RegisteredProvider> {
        self.providers.get(index)
    }

    #[must_use]
    pub fn descriptor(&self, index: usize) -> Option<&ProviderDescriptor> {
        self.providers.get(index).map(|p| &p.descriptor)
    }

    /// Position of a provider by stable name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.descriptor.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProvider> {
        self.providers.iter()
    }
}
