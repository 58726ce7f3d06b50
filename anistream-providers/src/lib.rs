// anistream provider clients
//
// Pure HTTP clients behind the core crate's collaborator traits:
// - consumet: Consumet-style stream provider APIs (episode catalogs and
//   watch endpoints), adapted to `StreamProvider`
// - anilist: AniList GraphQL metadata, adapted to `CatalogClient`
//
// The core crate never constructs these; the binary wires them up from
// configuration.

pub mod anilist;
pub mod consumet;
pub mod error;

pub use anilist::AniListCatalog;
pub use consumet::{ConsumetClient, ConsumetProvider};
pub use error::ClientError;
