//! Geocode cache client.
//!
//! Wraps a generic [`GeocodeCacheStore`] with:
//! - Key canonicalization: `(city, state)` → lower-cased `"city, state"`
//! - Telemetry injection: cache hit/miss reporting
//! - Degrade-on-error: a failing backend reads as a miss, write failures
//!   are logged and swallowed

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::traits::GeocodeCacheStore;
use crate::geo::Coordinate;
use crate::stop::location_key;
use crate::telemetry::ResolutionMetrics;

/// Typed client over the geocode cache store.
#[derive(Clone)]
pub struct GeocodeCacheClient {
    store: Arc<dyn GeocodeCacheStore>,
    metrics: Option<Arc<ResolutionMetrics>>,
}

impl GeocodeCacheClient {
    /// Create a client without telemetry.
    pub fn new(store: Arc<dyn GeocodeCacheStore>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Create a client that reports hits and misses.
    pub fn with_metrics(store: Arc<dyn GeocodeCacheStore>, metrics: Arc<ResolutionMetrics>) -> Self {
        Self {
            store,
            metrics: Some(metrics),
        }
    }

    /// Look up a coordinate for a city/state pair.
    ///
    /// Backend errors degrade to a miss so a flaky store never fails a
    /// resolution that the network tier could still answer.
    pub async fn get(&self, city: &str, state: &str) -> Option<Coordinate> {
        let key = location_key(city, state);
        match self.store.lookup(&key).await {
            Ok(Some(cached)) => {
                if let Some(ref m) = self.metrics {
                    m.cache_hit();
                }
                Some(Coordinate::new(cached.longitude, cached.latitude))
            }
            Ok(None) => {
                if let Some(ref m) = self.metrics {
                    m.cache_miss();
                }
                None
            }
            Err(e) => {
                warn!(error = %e, key = %key, "Geocode cache lookup failed");
                if let Some(ref m) = self.metrics {
                    m.cache_miss();
                }
                None
            }
        }
    }

    /// Write a resolved coordinate back under the canonical key.
    ///
    /// Best-effort: failures are logged and counted, never propagated.
    pub async fn write_back(&self, key: &str, coordinate: Coordinate) {
        match self
            .store
            .write(key, coordinate.latitude, coordinate.longitude)
            .await
        {
            Ok(()) => {
                debug!(key = %key, "Geocode cache write-back complete");
            }
            Err(e) => {
                warn!(error = %e, key = %key, "Geocode cache write-back failed");
                if let Some(ref m) = self.metrics {
                    m.write_back_failure();
                }
            }
        }
    }

    /// The underlying store, for spawned write-back tasks.
    pub fn store(&self) -> Arc<dyn GeocodeCacheStore> {
        Arc::clone(&self.store)
    }

    /// Current number of cached entries.
    pub fn entry_count(&self) -> u64 {
        self.store.entry_count()
    }
}
