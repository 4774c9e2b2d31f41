//! Geocode cache store: traits, providers, and the typed client.
//!
//! The store itself is a domain-agnostic key→coordinate map behind the
//! [`GeocodeCacheStore`] trait; [`GeocodeCacheClient`] layers canonical
//! key handling and telemetry on top. Two providers ship with the crate:
//! a moka-backed in-memory store and a JSON-file-backed persistent store.

mod client;
pub mod providers;
mod traits;

pub use client::GeocodeCacheClient;
pub use providers::{DiskCacheStore, MemoryCacheStore};
pub use traits::{BoxFuture, CacheStoreError, CachedCoordinate, GeocodeCacheStore};

#[cfg(test)]
pub use traits::tests::CountingCacheStore;
