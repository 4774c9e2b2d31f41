//! Geographic coordinate types and great-circle distance.
//!
//! Provides the WGS-84 coordinate pair used throughout the engine and the
//! haversine distance underlying route metrics. Distances are great-circle,
//! not drivable-road distances.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in statute miles, as used by the haversine formula.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS-84 coordinate pair.
///
/// Longitude comes first to match the `[lon, lat]` ordering geocoding
/// providers return in GeoJSON-style payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees (-180.0 to 180.0).
    pub longitude: f64,
    /// Latitude in degrees (-90.0 to 90.0).
    pub latitude: f64,
}

impl Coordinate {
    /// Create a coordinate from a longitude/latitude pair.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Computes the great-circle distance between two coordinates in miles.
///
/// Uses the haversine formula with Earth radius [`EARTH_RADIUS_MILES`].
/// The result is symmetric and zero (within floating-point tolerance)
/// for identical inputs.
#[inline]
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sums the great-circle distance over an ordered coordinate sequence.
///
/// Returns 0.0 for zero or one coordinates.
#[inline]
pub fn route_distance_miles(coordinates: &[Coordinate]) -> f64 {
    coordinates
        .windows(2)
        .map(|pair| haversine_miles(pair[0], pair[1]))
        .sum()
}
