//! Haulroute - Geocode resolution and route metrics for dispatch boards
//!
//! This library backs the route-map views of a trucking dispatch
//! dashboard: it turns a list of logical stops into resolved WGS-84
//! coordinates, computes great-circle route distance, and derives
//! fuel/cost/emissions estimates, while avoiding redundant network
//! lookups through a tiered geocode cache.
//!
//! # Architecture
//!
//! ```text
//! stops ──► RouteSession ──► ConcurrentResolutionOrchestrator
//!              │ (RouteKey memoization)       │
//!              │                              ▼
//!              │                   TieredGeocodeResolver
//!              │            precomputed → cache store → provider
//!              ▼                              │ (async write-back)
//!        RouteSnapshot ◄── distance + fuel ◄──┘
//! ```
//!
//! Rendering (map tiles, markers, UI) is an external consumer that only
//! reads the published values.

pub mod cache;
pub mod config;
mod engine;
pub mod geo;
pub mod log;
pub mod provider;
pub mod resolver;
pub mod route;
pub mod session;
pub mod stop;
pub mod telemetry;
pub mod token;

pub use cache::{DiskCacheStore, GeocodeCacheClient, GeocodeCacheStore, MemoryCacheStore};
pub use config::EngineConfig;
pub use engine::{EngineError, RouteEngine, RouteEngineBuilder};
pub use geo::Coordinate;
pub use provider::{MapboxProvider, ResolutionProvider};
pub use resolver::{ConcurrentResolutionOrchestrator, Resolution, TieredGeocodeResolver};
pub use route::{FuelEstimate, RouteComputation, RouteError, RouteOptions};
pub use session::{RouteSession, RouteSnapshot, SessionState};
pub use stop::{FuelType, RequiredBreak, RouteKey, Stop, StopKind, VehicleProfile};
pub use telemetry::{ResolutionMetrics, ResolutionSnapshot};
pub use token::{AccessTokenProvider, EnvTokenProvider, SharedTokenCache};
