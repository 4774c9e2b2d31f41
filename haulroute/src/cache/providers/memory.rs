//! In-memory cache store provider using moka.
//!
//! Wraps `moka::future::Cache` for an async-safe, lock-free store with
//! automatic LRU eviction. Entries are tiny fixed-size coordinates, so
//! capacity is bounded by entry count rather than bytes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::cache::traits::{BoxFuture, CacheStoreError, CachedCoordinate, GeocodeCacheStore};

/// Default number of locations retained in memory.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// In-memory geocode cache store.
///
/// Safe for concurrent use across async tasks; moka's internals are
/// lock-free on the read path.
pub struct MemoryCacheStore {
    cache: MokaCache<String, CachedCoordinate>,
    max_entries: AtomicU64,
}

impl MemoryCacheStore {
    /// Create a new in-memory store.
    ///
    /// # Arguments
    ///
    /// * `max_entries` - Maximum number of cached locations
    /// * `ttl` - Optional time-to-live for entries
    pub fn new(max_entries: u64, ttl: Option<Duration>) -> Self {
        let mut builder = MokaCache::builder().max_capacity(max_entries);

        if let Some(ttl_duration) = ttl {
            builder = builder.time_to_live(ttl_duration);
        }

        Self {
            cache: builder.build(),
            max_entries: AtomicU64::new(max_entries),
        }
    }

    /// Maximum configured entry count.
    pub fn max_entries(&self) -> u64 {
        self.max_entries.load(Ordering::Relaxed)
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, None)
    }
}

impl GeocodeCacheStore for MemoryCacheStore {
    fn lookup(
        &self,
        key: &str,
    ) -> BoxFuture<'_, Result<Option<CachedCoordinate>, CacheStoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn write(
        &self,
        key: &str,
        latitude: f64,
        longitude: f64,
    ) -> BoxFuture<'_, Result<(), CacheStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache
                .insert(
                    key,
                    CachedCoordinate {
                        latitude,
                        longitude,
                    },
                )
                .await;
            Ok(())
        })
    }

    fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
