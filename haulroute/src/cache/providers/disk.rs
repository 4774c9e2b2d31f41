//! Persistent cache store provider backed by a JSON file.
//!
//! Holds the full entry map in memory and writes the file through on every
//! update. Geocode caches are small (one entry per distinct city/state
//! pair a fleet actually serves), so a single JSON document keeps the
//! on-disk format inspectable and the read path allocation-free.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::traits::{BoxFuture, CacheStoreError, CachedCoordinate, GeocodeCacheStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    latitude: f64,
    longitude: f64,
    /// RFC 3339 timestamp of when the entry was resolved.
    resolved_at: String,
}

/// JSON-file-backed geocode cache store.
///
/// Entries survive process restarts; concurrent same-key writes are
/// last-write-wins, matching the immutable-fact semantics of geocode
/// entries.
pub struct DiskCacheStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, StoredEntry>>,
    /// Serializes file writes so interleaved persists cannot tear.
    io_lock: tokio::sync::Mutex<()>,
}

impl DiskCacheStore {
    /// Open a store at the given path, loading any existing entries.
    ///
    /// A missing file yields an empty store; the file and its parent
    /// directory are created on first write.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, CacheStoreError> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(data) => serde_json::from_str(&data)
                .map_err(|e| CacheStoreError::Serialization(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(
            path = %path.display(),
            entries = entries.len(),
            "Opened disk geocode cache"
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            io_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> Result<(), CacheStoreError> {
        let snapshot = self.entries.read().clone();
        let data = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| CacheStoreError::Serialization(e.to_string()))?;

        let _guard = self.io_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

impl GeocodeCacheStore for DiskCacheStore {
    fn lookup(
        &self,
        key: &str,
    ) -> BoxFuture<'_, Result<Option<CachedCoordinate>, CacheStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let hit = self.entries.read().get(&key).map(|entry| CachedCoordinate {
                latitude: entry.latitude,
                longitude: entry.longitude,
            });
            Ok(hit)
        })
    }

    fn write(
        &self,
        key: &str,
        latitude: f64,
        longitude: f64,
    ) -> BoxFuture<'_, Result<(), CacheStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.entries.write().insert(
                key,
                StoredEntry {
                    latitude,
                    longitude,
                    resolved_at: Utc::now().to_rfc3339(),
                },
            );
            self.persist().await
        })
    }

    fn entry_count(&self) -> u64 {
        self.entries.read().len() as u64
    }
}
