//! Core trait for the geocode cache store.
//!
//! The store is a persistent key→coordinate map with a deliberately small
//! surface: lookup, write, entry count. Keys are canonical lower-cased
//! `"city, state"` strings, human-readable in logs and identical across
//! providers. Entries are immutable facts about a location, so concurrent
//! same-key writes are idempotent and last-write-wins needs no merging.
//!
//! # Dyn Compatibility
//!
//! Async methods use `Pin<Box<dyn Future>>` so the store can be held as
//! `Arc<dyn GeocodeCacheStore>` and swapped per deployment (memory, disk,
//! or a managed backend adapter).

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A coordinate as stored in the geocode cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Errors that can occur during cache store operations.
#[derive(Debug, Error)]
pub enum CacheStoreError {
    /// I/O error from a persistent backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend-specific failure.
    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// Persistent key→coordinate store consumed by the tiered resolver.
///
/// Lookups match on the exact canonical key only, with no partial or
/// fuzzy matching. Write failures are reported but callers on the resolution
/// path ignore them: caching is an optimization, not a requirement.
pub trait GeocodeCacheStore: Send + Sync {
    /// Look up a coordinate by canonical location key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(coord))` on a hit
    /// - `Ok(None)` on a miss
    /// - `Err(_)` if the backend failed
    fn lookup(&self, key: &str) -> BoxFuture<'_, Result<Option<CachedCoordinate>, CacheStoreError>>;

    /// Store a coordinate under the canonical location key.
    ///
    /// Replaces any existing entry for the key.
    fn write(
        &self,
        key: &str,
        latitude: f64,
        longitude: f64,
    ) -> BoxFuture<'_, Result<(), CacheStoreError>>;

    /// Current number of cached entries.
    fn entry_count(&self) -> u64;
}
