//! Route metrics and computation results.
//!
//! [`RouteMetrics`] is the deterministic numeric core: cumulative
//! great-circle distance over an ordered coordinate sequence.
//! [`RouteComputation`] is the value published to the rendering layer,
//! carrying the coordinates, the distance, the optional fuel estimate,
//! and how many stops could not be resolved.

mod fuel;

pub use fuel::{estimate_fuel, FuelEstimate};

use thiserror::Error;

use crate::geo::{route_distance_miles, Coordinate};
use crate::resolver::Resolution;
use crate::stop::{RequiredBreak, Stop, VehicleProfile};

/// Per-invocation options for a route computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOptions {
    /// Pre-optimized stop ordering, used verbatim when present.
    pub optimized: Option<Vec<Stop>>,
    /// Required breaks along the route (count participates in route
    /// identity; coordinates are supplied externally).
    pub breaks: Vec<RequiredBreak>,
    /// Vehicle data for fuel estimation; never cached by the engine.
    pub vehicle: Option<VehicleProfile>,
}

impl RouteOptions {
    pub fn with_optimized(mut self, optimized: Vec<Stop>) -> Self {
        self.optimized = Some(optimized);
        self
    }

    pub fn with_breaks(mut self, breaks: Vec<RequiredBreak>) -> Self {
        self.breaks = breaks;
        self
    }

    pub fn with_vehicle(mut self, vehicle: VehicleProfile) -> Self {
        self.vehicle = Some(vehicle);
        self
    }
}

/// Errors surfaced to route consumers.
///
/// Partial failures never appear here; they degrade the computation
/// (fewer coordinates, `None` fuel estimate) instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// No stop in the request carries any resolvable location data.
    #[error("No stops with resolvable location data; nothing to render")]
    NothingToRender,
}

/// Distance metrics over an ordered, resolved coordinate sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMetrics {
    /// Resolved coordinates in route order.
    pub coordinates: Vec<Coordinate>,
    /// Sum of consecutive great-circle segment lengths; 0 for ≤1 points.
    pub total_distance_miles: f64,
}

impl RouteMetrics {
    /// Compute metrics from an ordered coordinate sequence.
    pub fn from_coordinates(coordinates: Vec<Coordinate>) -> Self {
        let total_distance_miles = route_distance_miles(&coordinates);
        Self {
            coordinates,
            total_distance_miles,
        }
    }
}

/// The published result of computing a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteComputation {
    /// Resolved coordinates in route order; unresolved stops are absent.
    pub coordinates: Vec<Coordinate>,
    /// Great-circle distance over the resolved coordinates.
    pub total_distance_miles: f64,
    /// Fuel/cost/emissions estimate, when a complete vehicle profile was
    /// supplied and the route has nonzero distance.
    pub fuel_estimate: Option<FuelEstimate>,
    /// Number of stops no resolution tier could answer.
    pub unresolved_stops: usize,
}

impl RouteComputation {
    /// Assemble the published value from per-stop resolutions.
    pub fn from_resolutions(resolutions: &[Resolution], vehicle: Option<&VehicleProfile>) -> Self {
        let coordinates: Vec<Coordinate> = resolutions
            .iter()
            .filter_map(Resolution::coordinate)
            .collect();
        let unresolved_stops = resolutions.len() - coordinates.len();

        let metrics = RouteMetrics::from_coordinates(coordinates);
        let fuel_estimate =
            vehicle.and_then(|profile| estimate_fuel(metrics.total_distance_miles, profile));

        Self {
            coordinates: metrics.coordinates,
            total_distance_miles: metrics.total_distance_miles,
            fuel_estimate,
            unresolved_stops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stop::FuelType;

    #[test]
    fn test_metrics_empty_is_zero() {
        let metrics = RouteMetrics::from_coordinates(Vec::new());
        assert_eq!(metrics.total_distance_miles, 0.0);
    }

    #[test]
    fn test_metrics_single_point_is_zero() {
        let metrics = RouteMetrics::from_coordinates(vec![Coordinate::new(-96.797, 32.777)]);
        assert_eq!(metrics.total_distance_miles, 0.0);
    }

    #[test]
    fn test_metrics_one_degree_longitude_at_equator() {
        let metrics = RouteMetrics::from_coordinates(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
        ]);
        assert!(
            (metrics.total_distance_miles - 69.09).abs() < 0.01,
            "got {}",
            metrics.total_distance_miles
        );
    }

    #[test]
    fn test_computation_excludes_unresolved() {
        let resolutions = vec![
            Resolution::Resolved(Coordinate::new(0.0, 0.0)),
            Resolution::Unresolved,
            Resolution::Resolved(Coordinate::new(1.0, 0.0)),
        ];

        let computation = RouteComputation::from_resolutions(&resolutions, None);

        assert_eq!(computation.coordinates.len(), 2);
        assert_eq!(computation.unresolved_stops, 1);
        assert!(computation.total_distance_miles > 0.0);
        assert!(computation.fuel_estimate.is_none());
    }

    #[test]
    fn test_computation_with_vehicle_profile() {
        let resolutions = vec![
            Resolution::Resolved(Coordinate::new(0.0, 0.0)),
            Resolution::Resolved(Coordinate::new(1.0, 0.0)),
        ];
        let profile = VehicleProfile::new(FuelType::Diesel, 6.5);

        let computation = RouteComputation::from_resolutions(&resolutions, Some(&profile));

        let estimate = computation.fuel_estimate.expect("estimate expected");
        assert_eq!(estimate.fuel_type, FuelType::Diesel);
        assert!(estimate.gallons > 0.0);
    }

    #[test]
    fn test_computation_zero_distance_has_no_estimate() {
        let resolutions = vec![Resolution::Resolved(Coordinate::new(0.0, 0.0))];
        let profile = VehicleProfile::new(FuelType::Diesel, 6.5);

        let computation = RouteComputation::from_resolutions(&resolutions, Some(&profile));
        assert!(computation.fuel_estimate.is_none());
    }

    #[test]
    fn test_route_error_display() {
        assert!(RouteError::NothingToRender
            .to_string()
            .contains("nothing to render"));
    }
}
