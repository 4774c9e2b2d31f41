//! Engine assembly and the route computation entry point.
//!
//! [`RouteEngine`] owns the wired resolution stack (cache store, token
//! cache, provider, orchestrator) and exposes the two consumer surfaces:
//! one-shot [`RouteEngine::compute_route`] and session creation for
//! callers that hold a route open across updates.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::cache::{
    CacheStoreError, DiskCacheStore, GeocodeCacheClient, GeocodeCacheStore, MemoryCacheStore,
};
use crate::config::EngineConfig;
use crate::provider::{
    AsyncHttpClient, MapboxProvider, ProviderError, ReqwestClient, ResolutionProvider,
};
use crate::resolver::{ConcurrentResolutionOrchestrator, TieredGeocodeResolver};
use crate::route::{RouteComputation, RouteError, RouteOptions};
use crate::session::RouteSession;
use crate::stop::Stop;
use crate::telemetry::{ResolutionMetrics, ResolutionSnapshot};
use crate::token::{AccessTokenProvider, EnvTokenProvider, SharedTokenCache};

/// Errors assembling an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The HTTP client could not be created.
    #[error("HTTP client setup failed: {0}")]
    HttpClient(ProviderError),

    /// The persistent cache store could not be opened.
    #[error("Cache store setup failed: {0}")]
    CacheStore(#[from] CacheStoreError),
}

/// The geocode resolution and route metrics engine.
pub struct RouteEngine {
    orchestrator: ConcurrentResolutionOrchestrator,
    metrics: Arc<ResolutionMetrics>,
}

impl RouteEngine {
    /// Start building an engine from a configuration.
    pub fn builder(config: EngineConfig) -> RouteEngineBuilder {
        RouteEngineBuilder {
            config,
            cache_store: None,
            provider: None,
            token_provider: None,
        }
    }

    /// Compute a route once: resolve all stops, derive distance and the
    /// optional fuel estimate.
    ///
    /// Partial failures degrade the result (`unresolved_stops > 0`,
    /// absent fuel estimate). The only error is [`RouteError::NothingToRender`],
    /// raised when no stop carries any resolvable location data.
    pub async fn compute_route(
        &self,
        stops: &[Stop],
        options: &RouteOptions,
    ) -> Result<RouteComputation, RouteError> {
        if stops.is_empty() || !stops.iter().any(Stop::has_location_data) {
            return Err(RouteError::NothingToRender);
        }

        let resolutions = self
            .orchestrator
            .resolve_route(stops, options.optimized.as_deref())
            .await;

        Ok(RouteComputation::from_resolutions(
            &resolutions,
            options.vehicle.as_ref(),
        ))
    }

    /// Create a session owning memoized route state for one consumer.
    pub fn create_session(self: &Arc<Self>) -> RouteSession {
        RouteSession::attach(Arc::clone(self))
    }

    /// Point-in-time resolution telemetry.
    pub fn telemetry(&self) -> ResolutionSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) fn metrics_handle(&self) -> Arc<ResolutionMetrics> {
        Arc::clone(&self.metrics)
    }
}

/// Builder wiring the engine's collaborators.
///
/// Every collaborator can be injected (tests, alternative backends);
/// whatever is not injected is built from the configuration.
pub struct RouteEngineBuilder {
    config: EngineConfig,
    cache_store: Option<Arc<dyn GeocodeCacheStore>>,
    provider: Option<Arc<dyn ResolutionProvider>>,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
}

impl RouteEngineBuilder {
    /// Inject a cache store instead of the configured one.
    pub fn with_cache_store(mut self, store: Arc<dyn GeocodeCacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Inject a resolution provider instead of the configured one.
    pub fn with_provider(mut self, provider: Arc<dyn ResolutionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Inject a token provider instead of the configured one.
    pub fn with_token_provider(mut self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Assemble the engine.
    pub async fn build(self) -> Result<RouteEngine, EngineError> {
        let metrics = Arc::new(ResolutionMetrics::new());

        let cache_store: Arc<dyn GeocodeCacheStore> = match self.cache_store {
            Some(store) => store,
            None => match &self.config.cache.disk_path {
                Some(path) => {
                    let store = DiskCacheStore::open(path).await?;
                    info!(
                        path = %path.display(),
                        entries = store.entry_count(),
                        "Using persistent geocode cache"
                    );
                    Arc::new(store)
                }
                None => Arc::new(MemoryCacheStore::new(
                    self.config.cache.memory_max_entries,
                    self.config.cache.memory_ttl_secs.map(Duration::from_secs),
                )),
            },
        };

        let provider: Arc<dyn ResolutionProvider> = match self.provider {
            Some(provider) => provider,
            None => {
                let http = ReqwestClient::with_timeout(self.config.provider.timeout_secs)
                    .map_err(EngineError::HttpClient)?;
                Arc::new(
                    MapboxProvider::new(Arc::new(http) as Arc<dyn AsyncHttpClient>)
                        .with_base_url(self.config.provider.base_url.clone()),
                )
            }
        };

        let token_provider: Arc<dyn AccessTokenProvider> = match self.token_provider {
            Some(provider) => provider,
            None => Arc::new(EnvTokenProvider::new(self.config.provider.token_env.clone())),
        };

        let resolver = TieredGeocodeResolver::new(
            GeocodeCacheClient::with_metrics(cache_store, Arc::clone(&metrics)),
            provider,
            Arc::new(SharedTokenCache::new(token_provider)),
            Arc::clone(&metrics),
        );

        let orchestrator = ConcurrentResolutionOrchestrator::new(
            Arc::new(resolver),
            self.config.resolver.max_in_flight,
        );

        info!(
            max_in_flight = self.config.resolver.max_in_flight,
            "Route engine ready"
        );

        Ok(RouteEngine {
            orchestrator,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CountingCacheStore;
    use crate::geo::Coordinate;
    use crate::provider::MockResolutionProvider;
    use crate::stop::{FuelType, StopKind, VehicleProfile};
    use crate::token::tests::StaticTokenProvider;

    async fn engine_with(provider: Arc<MockResolutionProvider>) -> Arc<RouteEngine> {
        let engine = RouteEngine::builder(EngineConfig::default())
            .with_cache_store(Arc::new(CountingCacheStore::new()))
            .with_provider(provider as Arc<dyn ResolutionProvider>)
            .with_token_provider(Arc::new(StaticTokenProvider::ok("tok")))
            .build()
            .await
            .unwrap();
        Arc::new(engine)
    }

    fn city_stop(sequence: u32, city: &str) -> Stop {
        Stop::new(StopKind::Pickup, sequence).with_city_state(city, "TX")
    }

    #[tokio::test]
    async fn test_compute_route_equator_distance() {
        let engine = engine_with(Arc::new(MockResolutionProvider::new())).await;
        // Precomputed coordinates: one degree of longitude at the equator
        let stops = vec![
            Stop::new(StopKind::Pickup, 0).with_precomputed(Coordinate::new(0.0, 0.0)),
            Stop::new(StopKind::Delivery, 1).with_precomputed(Coordinate::new(1.0, 0.0)),
        ];

        let computation = engine
            .compute_route(&stops, &RouteOptions::default())
            .await
            .unwrap();

        assert_eq!(computation.coordinates.len(), 2);
        assert!((computation.total_distance_miles - 69.09).abs() < 0.01);
        assert_eq!(computation.unresolved_stops, 0);
    }

    #[tokio::test]
    async fn test_compute_route_partial_failure() {
        let provider = Arc::new(MockResolutionProvider::new());
        for city in ["alpha", "bravo", "delta", "echo"] {
            provider.respond(city, Ok(Coordinate::new(0.0, 0.0)));
        }
        // "charlie" stays unmapped, so the provider reports NotFound
        let engine = engine_with(Arc::clone(&provider)).await;

        let stops: Vec<Stop> = ["alpha", "bravo", "charlie", "delta", "echo"]
            .iter()
            .enumerate()
            .map(|(i, city)| city_stop(i as u32, city))
            .collect();

        let computation = engine
            .compute_route(&stops, &RouteOptions::default())
            .await
            .unwrap();

        assert_eq!(computation.coordinates.len(), 4);
        assert_eq!(computation.unresolved_stops, 1);
    }

    #[tokio::test]
    async fn test_compute_route_fuel_estimate() {
        let engine = engine_with(Arc::new(MockResolutionProvider::new())).await;
        let stops = vec![
            Stop::new(StopKind::Pickup, 0).with_precomputed(Coordinate::new(0.0, 0.0)),
            Stop::new(StopKind::Delivery, 1).with_precomputed(Coordinate::new(1.0, 0.0)),
        ];
        let options =
            RouteOptions::default().with_vehicle(VehicleProfile::new(FuelType::Diesel, 6.5));

        let computation = engine.compute_route(&stops, &options).await.unwrap();

        let estimate = computation.fuel_estimate.expect("estimate expected");
        assert!(
            (estimate.gallons - computation.total_distance_miles / 6.5).abs() < 1e-9
        );
    }

    #[tokio::test]
    async fn test_compute_route_empty_is_nothing_to_render() {
        let engine = engine_with(Arc::new(MockResolutionProvider::new())).await;

        let result = engine.compute_route(&[], &RouteOptions::default()).await;
        assert_eq!(result.unwrap_err(), RouteError::NothingToRender);
    }

    #[tokio::test]
    async fn test_compute_route_no_resolvable_data_is_nothing_to_render() {
        let engine = engine_with(Arc::new(MockResolutionProvider::new())).await;
        let stops = vec![
            Stop::new(StopKind::Pickup, 0),
            Stop::new(StopKind::Delivery, 1),
        ];

        let result = engine.compute_route(&stops, &RouteOptions::default()).await;
        assert_eq!(result.unwrap_err(), RouteError::NothingToRender);
    }

    #[tokio::test]
    async fn test_provider_failures_degrade_not_error() {
        // All stops have location data but the provider knows none of them
        let engine = engine_with(Arc::new(MockResolutionProvider::new())).await;
        let stops = vec![city_stop(0, "alpha"), city_stop(1, "bravo")];

        let computation = engine
            .compute_route(&stops, &RouteOptions::default())
            .await
            .unwrap();

        assert!(computation.coordinates.is_empty());
        assert_eq!(computation.unresolved_stops, 2);
        assert_eq!(computation.total_distance_miles, 0.0);
    }

    #[tokio::test]
    async fn test_telemetry_reflects_resolution_activity() {
        let provider = Arc::new(MockResolutionProvider::new());
        provider.respond("alpha", Ok(Coordinate::new(0.0, 0.0)));
        let engine = engine_with(Arc::clone(&provider)).await;

        engine
            .compute_route(&[city_stop(0, "alpha")], &RouteOptions::default())
            .await
            .unwrap();

        let snapshot = engine.telemetry();
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.provider_calls, 1);
    }
}
