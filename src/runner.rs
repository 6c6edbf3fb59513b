use std::error::Error;

use clap::Parser;
use colored::*;
use csv::Writer;
use tracing::{error, info, span, warn, Instrument, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{LOCATION_COUNT, SEED};
use crate::config::Settings;
use crate::distance::providers::{DistanceProvider, ProviderKind};
use crate::domain::types::{Route, RouteRequest};
use crate::fixtures::data_generator::generate_random_inputs;
use crate::setup::init::load_operation;
use crate::solver::savings::compute_routes;
use crate::utils::Cancellation;

/// Command line options of the `routecraft` binary.
#[derive(Debug, Default, PartialEq, Parser)]
#[command(
    name = "routecraft",
    about = "Groups the clients of an operation into capacity-bounded vehicle routes"
)]
pub struct CliArgs {
    /// Operation id to route; defaults to the first operation in the CSV
    #[arg(long)]
    pub operation: Option<u64>,

    /// Operations CSV; overrides CLIENTS_CSV
    #[arg(long)]
    pub csv: Option<String>,

    /// Also print the routes as JSON
    #[arg(long)]
    pub json: bool,
}

/// Initialize tracing
fn init_tracing() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .try_init()?;
    Ok(())
}

/// Cancels on Ctrl-C and, when configured, after the compute timeout.
fn install_cancellation(settings: &Settings) -> Cancellation {
    let cancellation = settings
        .compute_timeout
        .map_or_else(Cancellation::new, Cancellation::with_timeout);

    let handle = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling route computation");
            handle.cancel();
        }
    });

    cancellation
}

fn load_request(args: &CliArgs, settings: &Settings) -> Result<(u64, RouteRequest), Box<dyn Error>> {
    match args.csv.as_ref().or(settings.clients_csv.as_ref()) {
        Some(path) => load_operation(path, args.operation),
        None => {
            info!("No operations CSV given, generating {} random clients", LOCATION_COUNT);
            Ok((
                0,
                generate_random_inputs(LOCATION_COUNT, settings.vehicle_capacity, SEED),
            ))
        }
    }
}

pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing()?;
    let args = CliArgs::parse();
    let settings = Settings::from_env()?;

    let (operation, request) = load_request(&args, &settings)?;
    let provider = ProviderKind::from_settings(&settings)?;
    let cancellation = install_cancellation(&settings);

    info!(
        "Starting route computation for operation {} using '{}'",
        operation,
        provider.name()
    );

    let routes = compute_routes(&provider, &request, &settings.planner_options(), &cancellation)
        .instrument(span!(Level::INFO, "compute", operation))
        .await
        .map_err(|e| {
            error!(
                "Route computation failed ({:?}, offending: {}): {}",
                e.kind(),
                e.offending().map_or("-".to_string(), |n| n.to_string()),
                e
            );
            e
        })?;

    print_routes(&routes, settings.vehicle_capacity);
    save_to_csv(&routes, &settings.routes_csv)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "routes": routes }))?
        );
    }

    Ok(())
}

fn print_routes(routes: &[Route], vehicle_capacity: i64) {
    println!("{}", "ROUTES".bold());
    for route in routes {
        let load = format!("{:>4} / {}", route.capacity, vehicle_capacity);
        let load = if nearly_full(route.capacity, vehicle_capacity) {
            load.yellow()
        } else {
            load.green()
        };
        println!(
            "  {} {}  {}  {:.1}",
            format!("vehicle {:>3}", route.vehicle).cyan(),
            load,
            route.route,
            route.distance
        );
    }

    let total_distance: f64 = routes.iter().map(|r| r.distance).sum();
    let total_load: i128 = routes.iter().map(|r| i128::from(r.capacity)).sum();
    println!(
        "{}",
        format!(
            "{} vehicles, total load {}, total distance {:.1}",
            routes.len(),
            total_load,
            total_distance
        )
        .bold()
    );
}

/// At least 90% of the vehicle capacity.
fn nearly_full(load: i64, vehicle_capacity: i64) -> bool {
    i128::from(load) * 10 >= i128::from(vehicle_capacity) * 9
}

fn save_to_csv(routes: &[Route], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record(["vehicle", "route", "capacity", "distance"])?;

    for route in routes {
        wtr.write_record([
            route.vehicle.to_string(),
            route.route.clone(),
            route.capacity.to_string(),
            route.distance.to_string(),
        ])?;
    }

    wtr.flush()?;
    info!("Wrote {} routes to {}", routes.len(), filename);
    Ok(())
}
