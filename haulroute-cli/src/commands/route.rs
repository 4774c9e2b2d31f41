//! The `route` subcommand: resolve a stops file and print metrics.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use haulroute::{
    EngineConfig, FuelType, RouteEngine, RouteOptions, Stop, VehicleProfile,
};

#[derive(Args)]
pub struct RouteArgs {
    /// Path to a JSON file containing an array of stops
    pub stops: PathBuf,

    /// Engine configuration file (INI)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Persist the geocode cache at the platform default location
    #[arg(long)]
    pub persistent_cache: bool,

    /// Vehicle fuel type for the fuel estimate (diesel, gasoline, electric)
    #[arg(long)]
    pub fuel_type: Option<String>,

    /// Vehicle fuel efficiency in miles per gallon
    #[arg(long)]
    pub mpg: Option<f64>,
}

fn parse_fuel_type(name: &str) -> FuelType {
    match name.to_lowercase().as_str() {
        "diesel" => FuelType::Diesel,
        "gasoline" | "gas" => FuelType::Gasoline,
        "electric" => FuelType::Electric,
        _ => FuelType::Other,
    }
}

fn vehicle_from_args(args: &RouteArgs) -> Option<VehicleProfile> {
    if args.fuel_type.is_none() && args.mpg.is_none() {
        return None;
    }
    Some(VehicleProfile {
        fuel_type: args.fuel_type.as_deref().map(parse_fuel_type),
        fuel_efficiency_mpg: args.mpg,
    })
}

pub async fn run(args: RouteArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_ini_file(path)?,
        None => EngineConfig::default(),
    };
    if args.persistent_cache && config.cache.disk_path.is_none() {
        config = config.with_default_disk_path();
    }

    let data = std::fs::read_to_string(&args.stops)?;
    let stops: Vec<Stop> = serde_json::from_str(&data)?;
    debug!(stops = stops.len(), "Loaded stops file");

    let mut options = RouteOptions::default();
    if let Some(vehicle) = vehicle_from_args(&args) {
        options = options.with_vehicle(vehicle);
    }

    let engine = RouteEngine::builder(config).build().await?;
    let computation = engine.compute_route(&stops, &options).await?;

    println!(
        "Resolved {}/{} stops",
        computation.coordinates.len(),
        computation.coordinates.len() + computation.unresolved_stops
    );
    for coordinate in &computation.coordinates {
        println!("  {:>10.5}, {:>10.5}", coordinate.latitude, coordinate.longitude);
    }
    println!("Distance: {:.1} miles", computation.total_distance_miles);

    match computation.fuel_estimate {
        Some(estimate) => println!(
            "Fuel: {:.1} gal {} (${:.2}), CO2 {:.1} lbs ({:.1} kg)",
            estimate.gallons,
            estimate.fuel_type,
            estimate.cost_usd,
            estimate.co2_lbs,
            estimate.co2_kg
        ),
        None => println!("Fuel: no estimate (vehicle profile incomplete or zero distance)"),
    }

    let telemetry = engine.telemetry();
    println!(
        "Cache: {} hits / {} misses, {} provider calls",
        telemetry.cache_hits, telemetry.cache_misses, telemetry.provider_calls
    );

    Ok(())
}
