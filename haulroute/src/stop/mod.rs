//! Route stop types.
//!
//! A [`Stop`] is a logical waypoint in a dispatch route: a pickup or a
//! delivery at a textual location, optionally carrying a coordinate that
//! was resolved upstream. Stops arrive from the dispatch backend as
//! camelCase JSON, which the serde derives here mirror.

mod key;

pub use key::RouteKey;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Whether a stop is a pickup or a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Pickup,
    Delivery,
}

impl StopKind {
    /// Lowercase wire name, also used in cache and route keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            StopKind::Pickup => "pickup",
            StopKind::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for StopKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical waypoint in a route.
///
/// Identity for geocode caching is `(city, state)` lower-cased; the full
/// address participates only in free-text provider queries when the cache
/// cannot answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    /// Pickup or delivery.
    pub kind: StopKind,
    /// Ordering hint within the route.
    pub sequence: u32,
    /// Street address, if known.
    #[serde(default)]
    pub address: Option<String>,
    /// City name, if known.
    #[serde(default)]
    pub city: Option<String>,
    /// State or province code, if known.
    #[serde(default)]
    pub state: Option<String>,
    /// Postal code, if known.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Coordinate resolved upstream, if any. Short-circuits resolution.
    #[serde(default)]
    pub precomputed: Option<Coordinate>,
}

impl Stop {
    /// Create a stop with no location data.
    pub fn new(kind: StopKind, sequence: u32) -> Self {
        Self {
            kind,
            sequence,
            address: None,
            city: None,
            state: None,
            postal_code: None,
            precomputed: None,
        }
    }

    /// Set the city and state.
    pub fn with_city_state(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }

    /// Set the street address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the postal code.
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Attach an already-resolved coordinate.
    pub fn with_precomputed(mut self, coordinate: Coordinate) -> Self {
        self.precomputed = Some(coordinate);
        self
    }

    /// Canonical geocode-cache key, present only when both city and state
    /// are known. Format: lower-cased `"city, state"`.
    pub fn cache_key(&self) -> Option<String> {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) => Some(location_key(city, state)),
            _ => None,
        }
    }

    /// Free-text geocoding query built from whatever location fields are
    /// present, or `None` when the stop has no usable text at all.
    pub fn free_text_query(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.address.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.postal_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Whether any resolution tier could possibly answer for this stop.
    pub fn has_location_data(&self) -> bool {
        self.precomputed.is_some() || self.free_text_query().is_some()
    }

    /// Identity fragment used by [`RouteKey`]: kind plus lower-cased
    /// location fields, so structurally equal stops compare equal
    /// regardless of allocation.
    pub(crate) fn key_fragment(&self) -> String {
        let location = self
            .cache_key()
            .or_else(|| self.free_text_query().map(|q| q.to_lowercase()))
            .unwrap_or_default();
        format!("{}:{}", self.kind, location)
    }
}

/// Canonical lower-cased `"city, state"` geocode-cache key.
///
/// Lookups are case-insensitive by construction: every reader and writer
/// funnels through this canonicalization, and the store matches exact
/// keys only.
pub fn location_key(city: &str, state: &str) -> String {
    format!(
        "{}, {}",
        city.trim().to_lowercase(),
        state.trim().to_lowercase()
    )
}

/// Returns the stops in the order resolution should process them.
///
/// A caller-supplied pre-optimized ordering wins verbatim; otherwise the
/// stops are sorted by their `sequence` field (stable, ascending).
pub fn effective_order<'a>(stops: &'a [Stop], optimized: Option<&'a [Stop]>) -> Vec<&'a Stop> {
    match optimized {
        Some(ordered) if !ordered.is_empty() => ordered.iter().collect(),
        _ => {
            let mut by_sequence: Vec<&Stop> = stops.iter().collect();
            by_sequence.sort_by_key(|stop| stop.sequence);
            by_sequence
        }
    }
}

/// Fuel type of the vehicle assigned to a route.
///
/// The dispatch backend is free-form here, so unrecognized values map to
/// [`FuelType::Other`] rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Diesel,
    Gasoline,
    Electric,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FuelType::Diesel => "diesel",
            FuelType::Gasoline => "gasoline",
            FuelType::Electric => "electric",
            FuelType::Other => "other",
        };
        f.write_str(name)
    }
}

/// Vehicle data supplied by the caller per invocation.
///
/// Both fields must be present for fuel estimation; the engine never
/// caches vehicle data internally.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfile {
    #[serde(default)]
    pub fuel_type: Option<FuelType>,
    #[serde(default)]
    pub fuel_efficiency_mpg: Option<f64>,
}

impl VehicleProfile {
    pub fn new(fuel_type: FuelType, fuel_efficiency_mpg: f64) -> Self {
        Self {
            fuel_type: Some(fuel_type),
            fuel_efficiency_mpg: Some(fuel_efficiency_mpg),
        }
    }
}

/// A mandated rest break along the route.
///
/// Break coordinates are supplied externally (e.g. by an HOS planner);
/// the engine never resolves them, but their count participates in route
/// identity so adding or removing a break triggers recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredBreak {
    /// Free-text location description.
    pub location: String,
    /// Break duration in minutes.
    pub duration_minutes: u32,
    /// Why the break is required (e.g. "HOS 30-minute").
    pub reason: String,
    /// Externally supplied coordinate, if any.
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_requires_city_and_state() {
        let full = Stop::new(StopKind::Pickup, 0).with_city_state("Dallas", "TX");
        assert_eq!(full.cache_key(), Some("dallas, tx".to_string()));

        let city_only = Stop {
            city: Some("Dallas".to_string()),
            ..Stop::new(StopKind::Pickup, 0)
        };
        assert_eq!(city_only.cache_key(), None);

        assert_eq!(Stop::new(StopKind::Delivery, 1).cache_key(), None);
    }

    #[test]
    fn test_cache_key_is_case_insensitive() {
        let upper = Stop::new(StopKind::Pickup, 0).with_city_state("DALLAS", "TX");
        let lower = Stop::new(StopKind::Pickup, 0).with_city_state("dallas", "tx");
        assert_eq!(upper.cache_key(), lower.cache_key());
    }

    #[test]
    fn test_location_key_trims_whitespace() {
        assert_eq!(location_key(" Dallas ", " TX"), "dallas, tx");
    }

    #[test]
    fn test_free_text_query_joins_present_fields() {
        let stop = Stop::new(StopKind::Pickup, 0)
            .with_address("2500 Victory Ave")
            .with_city_state("Dallas", "TX")
            .with_postal_code("75219");

        assert_eq!(
            stop.free_text_query(),
            Some("2500 Victory Ave, Dallas, TX, 75219".to_string())
        );
    }

    #[test]
    fn test_free_text_query_none_without_fields() {
        assert_eq!(Stop::new(StopKind::Pickup, 0).free_text_query(), None);
    }

    #[test]
    fn test_free_text_query_skips_blank_fields() {
        let stop = Stop {
            address: Some("  ".to_string()),
            city: Some("Tulsa".to_string()),
            ..Stop::new(StopKind::Delivery, 2)
        };
        assert_eq!(stop.free_text_query(), Some("Tulsa".to_string()));
    }

    #[test]
    fn test_has_location_data() {
        assert!(!Stop::new(StopKind::Pickup, 0).has_location_data());
        assert!(Stop::new(StopKind::Pickup, 0)
            .with_postal_code("75219")
            .has_location_data());
        assert!(Stop::new(StopKind::Pickup, 0)
            .with_precomputed(Coordinate::new(-96.8, 32.8))
            .has_location_data());
    }

    #[test]
    fn test_effective_order_sorts_by_sequence() {
        let stops = vec![
            Stop::new(StopKind::Delivery, 2).with_city_state("B", "TX"),
            Stop::new(StopKind::Pickup, 0).with_city_state("A", "TX"),
            Stop::new(StopKind::Delivery, 1).with_city_state("C", "TX"),
        ];

        let ordered = effective_order(&stops, None);
        let cities: Vec<_> = ordered.iter().map(|s| s.city.as_deref().unwrap()).collect();
        assert_eq!(cities, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_effective_order_prefers_optimized() {
        let stops = vec![
            Stop::new(StopKind::Pickup, 0).with_city_state("A", "TX"),
            Stop::new(StopKind::Delivery, 1).with_city_state("B", "TX"),
        ];
        let optimized = vec![
            Stop::new(StopKind::Delivery, 1).with_city_state("B", "TX"),
            Stop::new(StopKind::Pickup, 0).with_city_state("A", "TX"),
        ];

        let ordered = effective_order(&stops, Some(&optimized));
        let cities: Vec<_> = ordered.iter().map(|s| s.city.as_deref().unwrap()).collect();
        assert_eq!(cities, vec!["B", "A"]);
    }

    #[test]
    fn test_effective_order_ignores_empty_optimized() {
        let stops = vec![Stop::new(StopKind::Pickup, 0).with_city_state("A", "TX")];
        let ordered = effective_order(&stops, Some(&[]));
        assert_eq!(ordered.len(), 1);
    }

    #[test]
    fn test_fuel_type_deserializes_unknown_as_other() {
        let fuel: FuelType = serde_json::from_str("\"hydrogen\"").unwrap();
        assert_eq!(fuel, FuelType::Other);

        let diesel: FuelType = serde_json::from_str("\"diesel\"").unwrap();
        assert_eq!(diesel, FuelType::Diesel);
    }

    #[test]
    fn test_stop_deserializes_camel_case() {
        let json = r#"{
            "kind": "pickup",
            "sequence": 3,
            "city": "Dallas",
            "state": "TX",
            "postalCode": "75219"
        }"#;

        let stop: Stop = serde_json::from_str(json).unwrap();
        assert_eq!(stop.kind, StopKind::Pickup);
        assert_eq!(stop.sequence, 3);
        assert_eq!(stop.postal_code.as_deref(), Some("75219"));
        assert!(stop.precomputed.is_none());
    }

    #[test]
    fn test_vehicle_profile_defaults_empty() {
        let profile: VehicleProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.fuel_type.is_none());
        assert!(profile.fuel_efficiency_mpg.is_none());
    }
}
