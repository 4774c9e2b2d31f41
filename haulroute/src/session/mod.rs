//! Route session lifecycle.
//!
//! A [`RouteSession`] is the unit of ownership for one consumer's route
//! state: it memoizes the last computed result, keyed by [`RouteKey`], and
//! recomputes only when the key changes. The state machine is
//!
//! ```text
//! Uninitialized → Initializing → Ready ⇄ Updating → Disposed
//! ```
//!
//! with `Disposed` terminal and reachable from every state. Two race
//! rules hold at all times:
//!
//! - **Last writer wins by key**: when updates overlap, only the most
//!   recent cycle's result is applied, regardless of completion order.
//!   Superseded cycles are discarded and counted as stale.
//! - **Nothing after disposal**: a resolution completing after
//!   `dispose()` never mutates the published snapshot.
//!
//! Resolution failures degrade the snapshot (fewer coordinates, absent
//! fuel estimate) but never move the session into an error state.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::engine::RouteEngine;
use crate::geo::Coordinate;
use crate::route::{FuelEstimate, RouteError, RouteOptions};
use crate::stop::{RouteKey, Stop};
use crate::telemetry::ResolutionMetrics;

/// Lifecycle state of a route session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No stops supplied yet.
    Uninitialized,
    /// First resolution in flight.
    Initializing,
    /// A result for the current key is published.
    Ready,
    /// A resolution for a changed key is in flight.
    Updating,
    /// Terminal; no further results will be applied.
    Disposed,
}

/// The owned, published result of the session's last applied computation.
///
/// The rendering layer only reads this value; mutable rendering handles
/// (markers, layers) live entirely outside the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSnapshot {
    /// Key of the route this snapshot was computed for.
    pub key: RouteKey,
    /// Resolved coordinates in route order.
    pub coordinates: Vec<Coordinate>,
    /// Great-circle distance over the resolved coordinates.
    pub total_distance_miles: f64,
    /// Fuel estimate, when computable.
    pub fuel_estimate: Option<FuelEstimate>,
    /// Stops that could not be resolved.
    pub unresolved_stops: usize,
}

struct SessionInner {
    state: SessionState,
    /// Key of the currently published snapshot.
    applied_key: Option<RouteKey>,
    /// Bumped on every accepted update; completions from older
    /// generations are stale.
    generation: u64,
    snapshot: Option<RouteSnapshot>,
}

/// Session owning memoized route state for a single consumer.
pub struct RouteSession {
    engine: Arc<RouteEngine>,
    inner: Mutex<SessionInner>,
    cancel: CancellationToken,
    metrics: Arc<ResolutionMetrics>,
}

impl RouteSession {
    /// Attach a new session to the engine.
    pub fn attach(engine: Arc<RouteEngine>) -> Self {
        let metrics = engine.metrics_handle();
        Self {
            engine,
            inner: Mutex::new(SessionInner {
                state: SessionState::Uninitialized,
                applied_key: None,
                generation: 0,
                snapshot: None,
            }),
            cancel: CancellationToken::new(),
            metrics,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// The published snapshot, if a computation has been applied.
    pub fn snapshot(&self) -> Option<RouteSnapshot> {
        self.inner.lock().snapshot.clone()
    }

    /// Supply the current stop set; recompute only when the derived
    /// route key differs from the last applied one.
    ///
    /// Calls with an unchanged key are no-ops. Calls after disposal are
    /// ignored. Overlapping calls are safe: only the most recent key's
    /// result is ever published.
    pub async fn update(&self, stops: &[Stop], options: &RouteOptions) -> Result<(), RouteError> {
        if stops.is_empty() || !stops.iter().any(Stop::has_location_data) {
            return Err(RouteError::NothingToRender);
        }

        let key = RouteKey::for_route(stops, options.optimized.as_deref(), &options.breaks);

        let generation = {
            let mut inner = self.inner.lock();
            match inner.state {
                SessionState::Disposed => {
                    debug!("Update on disposed session ignored");
                    return Ok(());
                }
                SessionState::Ready if inner.applied_key.as_ref() == Some(&key) => {
                    debug!(key = %key, "Route key unchanged; skipping recomputation");
                    return Ok(());
                }
                SessionState::Uninitialized | SessionState::Initializing => {
                    inner.state = SessionState::Initializing;
                }
                SessionState::Ready | SessionState::Updating => {
                    inner.state = SessionState::Updating;
                }
            }
            inner.generation += 1;
            inner.generation
        };

        let computation = tokio::select! {
            _ = self.cancel.cancelled() => {
                self.metrics.stale_discard();
                debug!(key = %key, "Resolution abandoned: session disposed");
                return Ok(());
            }
            result = self.engine.compute_route(stops, options) => result,
        };

        let computation = match computation {
            Ok(computation) => computation,
            Err(e) => {
                // Input became unrenderable; fall back to the prior state
                let mut inner = self.inner.lock();
                if inner.state != SessionState::Disposed && inner.generation == generation {
                    inner.state = if inner.snapshot.is_some() {
                        SessionState::Ready
                    } else {
                        SessionState::Uninitialized
                    };
                }
                return Err(e);
            }
        };

        let mut inner = self.inner.lock();
        if inner.state == SessionState::Disposed {
            self.metrics.stale_discard();
            debug!(key = %key, "Discarding resolution completed after disposal");
            return Ok(());
        }
        if inner.generation != generation {
            self.metrics.stale_discard();
            debug!(key = %key, "Discarding resolution for superseded route key");
            return Ok(());
        }

        inner.snapshot = Some(RouteSnapshot {
            key: key.clone(),
            coordinates: computation.coordinates,
            total_distance_miles: computation.total_distance_miles,
            fuel_estimate: computation.fuel_estimate,
            unresolved_stops: computation.unresolved_stops,
        });
        inner.applied_key = Some(key);
        inner.state = SessionState::Ready;
        Ok(())
    }

    /// Release the session. Terminal: in-flight resolutions are
    /// cancelled or their results discarded, and no later completion can
    /// mutate the published snapshot.
    pub fn dispose(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state == SessionState::Disposed {
                return;
            }
            inner.state = SessionState::Disposed;
        }
        self.cancel.cancel();
        debug!("Route session disposed");
    }
}

impl Drop for RouteSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
