//! Fuel, cost, and emissions estimation.
//!
//! Derived from route distance and the vehicle profile supplied per
//! invocation. An estimate exists only when the profile is complete and
//! the distance is nonzero; callers must be able to tell "no estimate
//! available" apart from "estimate is zero", so the absent case is `None`
//! rather than a zero-filled value.

use crate::stop::{FuelType, VehicleProfile};

/// Pounds-to-kilograms conversion factor.
const LBS_TO_KG: f64 = 0.453592;

/// USD per unit of fuel (gallon, or kWh-equivalent for electric).
fn price_per_unit(fuel_type: FuelType) -> f64 {
    match fuel_type {
        FuelType::Diesel => 3.85,
        FuelType::Gasoline => 3.25,
        FuelType::Electric => 0.13,
        FuelType::Other => 3.50,
    }
}

/// Pounds of CO₂ emitted per unit of fuel burned.
fn co2_lbs_per_unit(fuel_type: FuelType) -> f64 {
    match fuel_type {
        FuelType::Diesel => 22.38,
        FuelType::Gasoline => 19.64,
        FuelType::Electric => 0.0,
        FuelType::Other => 20.0,
    }
}

/// Fuel consumption, cost, and emissions for a route.
///
/// Derived, never persisted; recomputed whenever distance or the vehicle
/// profile changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelEstimate {
    pub fuel_type: FuelType,
    pub mpg: f64,
    pub gallons: f64,
    pub cost_usd: f64,
    pub co2_lbs: f64,
    pub co2_kg: f64,
}

/// Estimate fuel usage for a route.
///
/// Returns `None` when `fuel_type` or `fuel_efficiency_mpg` is missing,
/// the efficiency is non-positive, or the distance is zero.
pub fn estimate_fuel(distance_miles: f64, profile: &VehicleProfile) -> Option<FuelEstimate> {
    let fuel_type = profile.fuel_type?;
    let mpg = profile.fuel_efficiency_mpg?;
    if distance_miles <= 0.0 || mpg <= 0.0 {
        return None;
    }

    let gallons = distance_miles / mpg;
    let co2_lbs = gallons * co2_lbs_per_unit(fuel_type);

    Some(FuelEstimate {
        fuel_type,
        mpg,
        gallons,
        cost_usd: gallons * price_per_unit(fuel_type),
        co2_lbs,
        co2_kg: co2_lbs * LBS_TO_KG,
    })
}
