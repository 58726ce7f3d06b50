//! AniList GraphQL catalog: client plus wire types.

mod client;
mod types;

pub use client::AniListCatalog;
pub use types::{GraphQlResponse, MediaEntry, MediaTitle};
