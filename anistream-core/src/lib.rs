// anistream core
//
// Provider-fallback stream resolution engine: given a title, discover its
// episode list, then for a chosen episode discover playable stream sources,
// retrying transient failures and falling over to alternate providers in
// priority order.
//
// Architecture:
// - anistream-core: data model, provider trait + registry, retry wrapper,
//   resolvers, source selector, playback session controller
// - anistream-providers: HTTP clients implementing the core traits
// - anistream: CLI binary wiring config, catalog, registry and controller

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod provider;
pub mod resolve;
pub mod session;
pub mod sink;
pub mod test_helpers;

pub use error::{Error, Result};
