//! Provider abstraction: the trait each content provider implements, the
//! ordered registry encoding fallback priority, and per-attempt errors.

mod error;
mod registry;
mod traits;

pub use error::ProviderError;
pub use registry::{ProviderDescriptor, ProviderRegistry, RegisteredProvider};
pub use traits::StreamProvider;
