//! Concurrent route resolution.
//!
//! Fans out tiered resolution for every stop in a route, bounds the number
//! of in-flight resolutions, and reassembles results positionally so the
//! output order never depends on which network call finished first.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use super::{Resolution, TieredGeocodeResolver};
use crate::stop::{effective_order, Stop};

/// Default cap on in-flight resolutions per route.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Resolves all stops of a route concurrently.
///
/// Individual unresolved stops degrade the output rather than aborting
/// the batch: a route with 9 of 10 stops resolved still renders.
pub struct ConcurrentResolutionOrchestrator {
    resolver: Arc<TieredGeocodeResolver>,
    limiter: Arc<Semaphore>,
}

impl ConcurrentResolutionOrchestrator {
    pub fn new(resolver: Arc<TieredGeocodeResolver>, max_in_flight: usize) -> Self {
        Self {
            resolver,
            limiter: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Resolve every stop, returning results aligned to resolution order.
    ///
    /// Resolution order is the caller's pre-optimized ordering when
    /// supplied, otherwise the stops sorted by `sequence` ascending.
    /// `results[i]` always corresponds to the i-th stop of that order,
    /// regardless of completion order.
    pub async fn resolve_route(
        &self,
        stops: &[Stop],
        optimized: Option<&[Stop]>,
    ) -> Vec<Resolution> {
        let ordered = effective_order(stops, optimized);
        debug!(stops = ordered.len(), "Resolving route");

        let resolutions = ordered.into_iter().map(|stop| {
            let resolver = Arc::clone(&self.resolver);
            let limiter = Arc::clone(&self.limiter);
            let stop = stop.clone();
            async move {
                let _permit = limiter
                    .acquire_owned()
                    .await
                    .expect("resolution limiter closed");
                resolver.resolve(&stop).await
            }
        });

        join_all(resolutions).await
    }
}
