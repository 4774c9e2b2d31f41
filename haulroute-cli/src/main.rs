//! Haulroute command-line interface.
//!
//! Exposes the route engine for ad-hoc use and smoke-testing: feed it a
//! stops file, get back resolved coordinates, distance, and fuel metrics.

mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "haulroute",
    version,
    about = "Route resolution and metrics for dispatch boards"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a route from a stops file and print its metrics
    Route(commands::route::RouteArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    haulroute::log::init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Route(args) => commands::route::run(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
