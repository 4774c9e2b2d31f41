//! Access token acquisition for the resolution provider.
//!
//! The geocoding provider requires a bearer credential that is expensive
//! to fetch and valid for the process lifetime. [`SharedTokenCache`] owns
//! the one token slot: concurrent first users coalesce onto a single
//! in-flight fetch, a successful fetch is cached forever, and a failed
//! fetch degrades the network tier rather than crashing the engine.
//!
//! This replaces the global-mutable-token pattern with an explicitly
//! owned, injectable service.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::BoxFuture;

/// Errors from token acquisition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The credential could not be fetched.
    #[error("Access token unavailable: {0}")]
    Unavailable(String),
}

/// Source of the raw credential.
///
/// Implementations may read an environment variable, a credentials file,
/// or call an auth endpoint; the cache layer above is indifferent.
pub trait AccessTokenProvider: Send + Sync {
    /// Fetch the credential. Called at most once concurrently.
    fn fetch_token(&self) -> BoxFuture<'_, Result<String, TokenError>>;
}

/// Token provider that reads an environment variable.
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl AccessTokenProvider for EnvTokenProvider {
    fn fetch_token(&self) -> BoxFuture<'_, Result<String, TokenError>> {
        Box::pin(async move {
            match std::env::var(&self.var) {
                Ok(token) if !token.trim().is_empty() => Ok(token),
                Ok(_) => Err(TokenError::Unavailable(format!(
                    "{} is set but empty",
                    self.var
                ))),
                Err(_) => Err(TokenError::Unavailable(format!("{} is not set", self.var))),
            }
        })
    }
}

/// Process-wide, lazily-initialized token slot with single-flight fetch.
///
/// The slot mutex is held across the fetch, so concurrent first callers
/// queue behind one network round-trip instead of issuing duplicates.
/// Success is cached for the process lifetime; failure leaves the slot
/// empty so a later call may retry.
pub struct SharedTokenCache {
    provider: Arc<dyn AccessTokenProvider>,
    slot: tokio::sync::Mutex<Option<Arc<str>>>,
}

impl SharedTokenCache {
    pub fn new(provider: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            provider,
            slot: tokio::sync::Mutex::new(None),
        }
    }

    /// Get the cached token, fetching it on first use.
    pub async fn get(&self) -> Result<Arc<str>, TokenError> {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(Arc::clone(token));
        }

        match self.provider.fetch_token().await {
            Ok(token) => {
                debug!("Access token acquired");
                let token: Arc<str> = token.into();
                *slot = Some(Arc::clone(&token));
                Ok(token)
            }
            Err(e) => {
                warn!(error = %e, "Access token fetch failed; network resolution degraded");
                Err(e)
            }
        }
    }
}
