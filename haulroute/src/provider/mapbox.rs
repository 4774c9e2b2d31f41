//! Mapbox-style forward geocoding provider.
//!
//! Calls the places endpoint with a free-text query and takes the first
//! feature's `center` as the resolved coordinate. The response shape
//! (`features[].center` as `[lon, lat]`) is shared by several commercial
//! geocoders, so the base URL is injectable.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::traits::{ProviderError, ResolutionProvider};
use crate::cache::BoxFuture;
use crate::geo::Coordinate;

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[longitude, latitude]`
    center: [f64; 2],
}

/// Forward geocoding against a Mapbox-compatible places API.
pub struct MapboxProvider {
    http: Arc<dyn AsyncHttpClient>,
    base_url: String,
}

impl MapboxProvider {
    pub fn new(http: Arc<dyn AsyncHttpClient>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (self-hosted gateways, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, query: &str, token: &str) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{}.json?access_token={}&limit=1",
            self.base_url,
            encode_component(query),
            token
        )
    }
}

impl ResolutionProvider for MapboxProvider {
    fn geocode(&self, query: &str, token: &str) -> BoxFuture<'_, Result<Coordinate, ProviderError>> {
        let url = self.request_url(query, token);
        let query = query.to_string();
        Box::pin(async move {
            debug!(query = %query, "Calling geocoding provider");

            let body = self.http.get(&url).await?;

            let response: GeocodeResponse = serde_json::from_slice(&body)
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            let feature = response.features.first().ok_or(ProviderError::NotFound)?;
            let [longitude, latitude] = feature.center;
            Ok(Coordinate::new(longitude, latitude))
        })
    }
}

/// Percent-encodes a query for use as a URL path segment.
///
/// Unreserved characters pass through; everything else is encoded
/// byte-wise, so addresses with `#`, `?`, or unicode survive intact.
fn encode_component(component: &str) -> String {
    let mut encoded = String::with_capacity(component.len());
    for byte in component.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b',' => {
                encoded.push(byte as char);
            }
            _ => {
                let _ = write!(encoded, "%{:02X}", byte);
            }
        }
    }
    encoded
}
