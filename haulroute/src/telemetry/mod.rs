//! Resolution telemetry for observability.
//!
//! Lock-free atomic counters recording how the tiered resolver behaves in
//! production: cache effectiveness, provider traffic, and how often stale
//! work was discarded. Counters are written by the engine and read as
//! point-in-time [`ResolutionSnapshot`] copies by whatever surface wants
//! them (CLI output, dashboards).

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for the resolution pipeline.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    provider_calls: AtomicU64,
    provider_failures: AtomicU64,
    write_back_failures: AtomicU64,
    stale_discards: AtomicU64,
}

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a geocode-cache hit.
    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a geocode-cache miss.
    pub fn cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a network provider call.
    pub fn provider_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a provider miss or failure.
    pub fn provider_failure(&self) {
        self.provider_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed cache write-back.
    pub fn write_back_failure(&self) {
        self.write_back_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a resolution result discarded as stale (superseded key or
    /// disposed session).
    pub fn stale_discard(&self) {
        self.stale_discards.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters.
    pub fn snapshot(&self) -> ResolutionSnapshot {
        ResolutionSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
            write_back_failures: self.write_back_failures.load(Ordering::Relaxed),
            stale_discards: self.stale_discards.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ResolutionMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub provider_calls: u64,
    pub provider_failures: u64,
    pub write_back_failures: u64,
    pub stale_discards: u64,
}

impl ResolutionSnapshot {
    /// Cache hit rate in [0.0, 1.0], or 0.0 with no lookups yet.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}
