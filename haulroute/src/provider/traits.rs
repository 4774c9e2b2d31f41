//! Resolution provider trait and errors.

use crate::cache::BoxFuture;
use crate::geo::Coordinate;
use thiserror::Error;

/// Errors from the network geocoding provider.
///
/// `NotFound` is distinguished from transport errors so telemetry can
/// separate bad addresses from bad infrastructure; the resolver treats
/// both as an unresolved stop.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider returned no match for the query.
    #[error("No geocoding match for query")]
    NotFound,

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body could not be parsed.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

/// A network geocoding service.
///
/// Implementations translate a free-text location query into a WGS-84
/// coordinate using the supplied access token.
pub trait ResolutionProvider: Send + Sync {
    /// Geocode a free-text query.
    fn geocode(&self, query: &str, token: &str) -> BoxFuture<'_, Result<Coordinate, ProviderError>>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock resolution provider for testing.
    ///
    /// Maps queries to canned results (default: `NotFound`), supports
    /// per-query delays, and tracks call count plus peak concurrency.
    pub struct MockResolutionProvider {
        responses: Mutex<HashMap<String, (Result<Coordinate, ProviderError>, Duration)>>,
        calls: AtomicU64,
        active: AtomicU64,
        peak_active: AtomicU64,
    }

    impl MockResolutionProvider {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                calls: AtomicU64::new(0),
                active: AtomicU64::new(0),
                peak_active: AtomicU64::new(0),
            }
        }

        /// Canned response for a query containing `needle`.
        pub fn respond(&self, needle: &str, result: Result<Coordinate, ProviderError>) {
            self.respond_after(needle, result, Duration::ZERO);
        }

        /// Canned response delivered after a delay.
        pub fn respond_after(
            &self,
            needle: &str,
            result: Result<Coordinate, ProviderError>,
            delay: Duration,
        ) {
            self.responses
                .lock()
                .unwrap()
                .insert(needle.to_string(), (result, delay));
        }

        pub fn call_count(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn peak_concurrency(&self) -> u64 {
            self.peak_active.load(Ordering::SeqCst)
        }

        fn lookup(&self, query: &str) -> (Result<Coordinate, ProviderError>, Duration) {
            let responses = self.responses.lock().unwrap();
            responses
                .iter()
                .find(|(needle, _)| query.contains(needle.as_str()))
                .map(|(_, entry)| entry.clone())
                .unwrap_or((Err(ProviderError::NotFound), Duration::ZERO))
        }
    }

    impl ResolutionProvider for MockResolutionProvider {
        fn geocode(
            &self,
            query: &str,
            _token: &str,
        ) -> BoxFuture<'_, Result<Coordinate, ProviderError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (result, delay) = self.lookup(query);
            Box::pin(async move {
                let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak_active.fetch_max(now_active, Ordering::SeqCst);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.active.fetch_sub(1, Ordering::SeqCst);
                result
            })
        }
    }

    #[test]
    fn test_provider_error_display() {
        assert!(ProviderError::NotFound.to_string().contains("No geocoding"));
        assert!(ProviderError::Http("503".to_string())
            .to_string()
            .contains("503"));
        assert!(ProviderError::Parse("eof".to_string())
            .to_string()
            .contains("eof"));
    }

    #[tokio::test]
    async fn test_mock_provider_defaults_to_not_found() {
        let mock = MockResolutionProvider::new();
        let result = mock.geocode("anywhere", "tok").await;
        assert_eq!(result.unwrap_err(), ProviderError::NotFound);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_matches_needle() {
        let mock = MockResolutionProvider::new();
        mock.respond("Dallas", Ok(Coordinate::new(-96.797, 32.777)));

        let coord = mock.geocode("Dallas, TX", "tok").await.unwrap();
        assert_eq!(coord, Coordinate::new(-96.797, 32.777));
    }
}
