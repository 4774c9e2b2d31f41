//! Tiered geocode resolution.
//!
//! [`TieredGeocodeResolver`] answers "where is this stop?" through a fixed
//! cost hierarchy, each tier attempted only when the previous one cannot
//! answer:
//!
//! 1. **Precomputed**: the stop already carries a coordinate; zero I/O.
//! 2. **Cache store**: canonical `"city, state"` lookup; one storage read.
//! 3. **Network provider**: free-text geocoding; one HTTP round-trip,
//!    with a best-effort async write-back so the next route sees tier 2.
//!
//! Failures never propagate: a stop that no tier can answer is simply
//! [`Resolution::Unresolved`] and the rest of the route proceeds.

mod orchestrator;

pub use orchestrator::{ConcurrentResolutionOrchestrator, DEFAULT_MAX_IN_FLIGHT};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::GeocodeCacheClient;
use crate::geo::Coordinate;
use crate::provider::{ProviderError, ResolutionProvider};
use crate::stop::Stop;
use crate::telemetry::ResolutionMetrics;
use crate::token::SharedTokenCache;

/// Outcome of resolving a single stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The stop resolved to a coordinate.
    Resolved(Coordinate),
    /// No tier could answer; the stop is excluded from route output.
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Resolution::Resolved(coord) => Some(*coord),
            Resolution::Unresolved => None,
        }
    }
}

/// Resolves stops through the precomputed → cache → network tier order.
pub struct TieredGeocodeResolver {
    cache: GeocodeCacheClient,
    provider: Arc<dyn ResolutionProvider>,
    tokens: Arc<SharedTokenCache>,
    metrics: Arc<ResolutionMetrics>,
}

impl TieredGeocodeResolver {
    pub fn new(
        cache: GeocodeCacheClient,
        provider: Arc<dyn ResolutionProvider>,
        tokens: Arc<SharedTokenCache>,
        metrics: Arc<ResolutionMetrics>,
    ) -> Self {
        Self {
            cache,
            provider,
            tokens,
            metrics,
        }
    }

    /// Resolve one stop to a coordinate, or report it unresolved.
    pub async fn resolve(&self, stop: &Stop) -> Resolution {
        // Tier 1: the caller already knows the coordinate
        if let Some(coordinate) = stop.precomputed {
            return Resolution::Resolved(coordinate);
        }

        // Tier 2: canonical city/state lookup against the cache store
        if let (Some(city), Some(state)) = (stop.city.as_deref(), stop.state.as_deref()) {
            if let Some(coordinate) = self.cache.get(city, state).await {
                return Resolution::Resolved(coordinate);
            }
        }

        // Tier 3: free-text network geocoding
        let Some(query) = stop.free_text_query() else {
            // Nothing to even ask a provider about; answer without I/O
            return Resolution::Unresolved;
        };

        let token = match self.tokens.get().await {
            Ok(token) => token,
            Err(_) => {
                // TokenUnavailable degrades the network tier, not the route
                debug!(query = %query, "Skipping network tier: no access token");
                return Resolution::Unresolved;
            }
        };

        self.metrics.provider_call();
        match self.provider.geocode(&query, &token).await {
            Ok(coordinate) => {
                self.spawn_write_back(stop, coordinate);
                Resolution::Resolved(coordinate)
            }
            Err(ProviderError::NotFound) => {
                self.metrics.provider_failure();
                debug!(query = %query, "Provider returned no match");
                Resolution::Unresolved
            }
            Err(e) => {
                self.metrics.provider_failure();
                warn!(error = %e, query = %query, "Provider call failed");
                Resolution::Unresolved
            }
        }
    }

    /// Best-effort async write-back of a network result.
    ///
    /// Only stops with a canonical city/state identity are cacheable; the
    /// write happens off the resolution path and its failure is absorbed
    /// by the cache client.
    fn spawn_write_back(&self, stop: &Stop, coordinate: Coordinate) {
        if let Some(key) = stop.cache_key() {
            let cache = self.cache.clone();
            tokio::spawn(async move {
                cache.write_back(&key, coordinate).await;
            });
        }
    }
}
