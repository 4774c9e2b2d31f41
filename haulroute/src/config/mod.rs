//! Engine configuration.
//!
//! [`EngineConfig`] is the single configuration surface for wiring the
//! engine: provider endpoint and credential source, cache sizing and
//! persistence, and resolver concurrency. It can be assembled in code
//! with the `with_*` setters or loaded from an INI config file.

use std::path::PathBuf;

use ini::Ini;
use thiserror::Error;

use crate::resolver::DEFAULT_MAX_IN_FLIGHT;

/// Default environment variable holding the provider access token.
pub const DEFAULT_TOKEN_ENV: &str = "HAULROUTE_ACCESS_TOKEN";

/// Default maximum number of locations retained in the memory cache.
pub const DEFAULT_MEMORY_MAX_ENTRIES: u64 = 10_000;

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or parsed.
    #[error("Failed to load config file: {0}")]
    Load(String),

    /// A setting has a value of the wrong shape.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Resolution provider settings.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
    /// Geocoding API base URL.
    pub base_url: String,
    /// Environment variable the access token is read from.
    pub token_env: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapbox.com".to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Geocode cache settings.
#[derive(Clone, Debug)]
pub struct CacheSettings {
    /// Maximum entries held by the in-memory store.
    pub memory_max_entries: u64,
    /// Optional TTL for in-memory entries, in seconds.
    pub memory_ttl_secs: Option<u64>,
    /// Path of the persistent JSON store; `None` keeps the cache
    /// memory-only.
    pub disk_path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            memory_max_entries: DEFAULT_MEMORY_MAX_ENTRIES,
            memory_ttl_secs: None,
            disk_path: None,
        }
    }
}

/// Resolver concurrency settings.
#[derive(Clone, Debug)]
pub struct ResolverSettings {
    /// Cap on concurrently in-flight stop resolutions.
    pub max_in_flight: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    pub provider: ProviderSettings,
    pub cache: CacheSettings,
    pub resolver: ResolverSettings,
}

impl EngineConfig {
    /// Load configuration from an INI file.
    ///
    /// Absent sections and keys keep their defaults, so a config file
    /// only needs to state what it overrides.
    pub fn from_ini_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path.as_ref()).map_err(|e| ConfigError::Load(e.to_string()))?;
        let mut config = Self::default();

        if let Some(value) = ini.get_from(Some("provider"), "base_url") {
            config.provider.base_url = value.to_string();
        }
        if let Some(value) = ini.get_from(Some("provider"), "token_env") {
            config.provider.token_env = value.to_string();
        }
        if let Some(value) = ini.get_from(Some("provider"), "timeout_secs") {
            config.provider.timeout_secs = parse_number(value, "provider.timeout_secs")?;
        }

        if let Some(value) = ini.get_from(Some("cache"), "memory_max_entries") {
            config.cache.memory_max_entries = parse_number(value, "cache.memory_max_entries")?;
        }
        if let Some(value) = ini.get_from(Some("cache"), "memory_ttl_secs") {
            config.cache.memory_ttl_secs = Some(parse_number(value, "cache.memory_ttl_secs")?);
        }
        if let Some(value) = ini.get_from(Some("cache"), "disk_path") {
            config.cache.disk_path = Some(PathBuf::from(value));
        }

        if let Some(value) = ini.get_from(Some("resolver"), "max_in_flight") {
            let parsed: u64 = parse_number(value, "resolver.max_in_flight")?;
            config.resolver.max_in_flight = parsed as usize;
        }

        Ok(config)
    }

    /// Set the provider base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.provider.base_url = base_url.into();
        self
    }

    /// Set the token environment variable name.
    pub fn with_token_env(mut self, token_env: impl Into<String>) -> Self {
        self.provider.token_env = token_env.into();
        self
    }

    /// Set the memory cache capacity.
    pub fn with_memory_max_entries(mut self, max_entries: u64) -> Self {
        self.cache.memory_max_entries = max_entries;
        self
    }

    /// Enable the persistent disk store at the given path.
    pub fn with_disk_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache.disk_path = Some(path.into());
        self
    }

    /// Enable the persistent disk store at the platform default location.
    pub fn with_default_disk_path(mut self) -> Self {
        self.cache.disk_path = default_cache_path();
        self
    }

    /// Set the resolver concurrency cap.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.resolver.max_in_flight = max_in_flight;
        self
    }
}

/// Platform default location for the persistent geocode cache.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("haulroute").join("geocode-cache.json"))
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
