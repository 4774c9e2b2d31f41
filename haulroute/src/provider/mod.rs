//! Network geocoding provider abstraction.
//!
//! The resolution provider is the most expensive tier of the resolver and
//! is only consulted when neither a precomputed coordinate nor the cache
//! store can answer. The trait keeps the engine independent of any one
//! geocoding vendor; [`MapboxProvider`] is the shipped implementation.

mod http;
mod mapbox;
mod traits;

pub use http::{AsyncHttpClient, ReqwestClient};
pub use mapbox::MapboxProvider;
pub use traits::{ProviderError, ResolutionProvider};

#[cfg(test)]
pub use http::tests::MockHttpClient;
#[cfg(test)]
pub use traits::tests::MockResolutionProvider;
