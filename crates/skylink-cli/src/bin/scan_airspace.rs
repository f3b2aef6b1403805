//! Pairwise collision scan over two CSV batches.
//!
//! Loads an aircraft states export and a drone telemetry export, runs the
//! dual-threshold detector, prints summary statistics, and optionally
//! writes the alerts to a timestamped JSON file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skylink_cli::{load, report};
use skylink_core::{
    detect_collisions, summarize, AltitudeRange, BatchFilter, DataSnapshot, GeoBounds,
    SeparationRules,
};

/// Detect aircraft/drone separation violations in two CSV batches
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Aircraft states CSV (OpenSky live states export)
    #[arg(long)]
    planes: PathBuf,

    /// Drone telemetry CSV
    #[arg(long)]
    drones: PathBuf,

    /// Horizontal separation threshold in kilometers
    #[arg(long, default_value_t = 0.5)]
    horizontal_km: f64,

    /// Vertical separation threshold in meters
    #[arg(long, default_value_t = 100.0)]
    vertical_m: f64,

    /// Geographic bounding box: min_lat,max_lat,min_lon,max_lon
    #[arg(long, value_delimiter = ',', num_args = 4)]
    bounds: Option<Vec<f64>>,

    /// Altitude band in meters: min_m,max_m
    #[arg(long, value_delimiter = ',', num_args = 2)]
    altitude: Option<Vec<f64>>,

    /// Directory for the JSON alert export; no file is written when absent
    #[arg(long)]
    out: Option<PathBuf>,
}

impl Args {
    fn batch_filter(&self) -> BatchFilter {
        BatchFilter {
            bounds: self.bounds.as_deref().map(|b| GeoBounds {
                min_lat: b[0],
                max_lat: b[1],
                min_lon: b[2],
                max_lon: b[3],
            }),
            altitude: self.altitude.as_deref().map(|a| AltitudeRange {
                min_m: a[0],
                max_m: a[1],
            }),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let aircraft_rows = load::read_aircraft_csv(&args.planes)?;
    let drone_rows = load::read_drone_csv(&args.drones)?;

    let snapshot = args
        .batch_filter()
        .apply(DataSnapshot::from_records(aircraft_rows, drone_rows));

    tracing::info!(
        aircraft = snapshot.aircraft.len(),
        drones = snapshot.drones.len(),
        skipped_aircraft = snapshot.skipped_aircraft,
        skipped_drones = snapshot.skipped_drones,
        "processing batches for collision detection"
    );

    let rules = SeparationRules::new(args.horizontal_km, args.vertical_m);
    let result = detect_collisions(&snapshot, &rules);
    let summary = summarize(&result.alerts);

    println!(
        "Collision detection complete: {} potential collisions out of {} pairs ({} pairs skipped)",
        result.alerts.len(),
        result.pairs_checked,
        result.pairs_skipped
    );
    println!(
        "Unique drones: {}, unique planes: {}",
        summary.unique_drones, summary.unique_planes
    );
    if summary.total_alerts > 0 {
        println!(
            "Min separation: {:.3} km horizontal, {:.2} m vertical",
            summary.min_horizontal_km, summary.min_vertical_m
        );
    }

    if let Some(dir) = &args.out {
        let path = report::write_collision_report(&result, &summary, dir)?;
        println!("Alerts written to {}", path.display());
    }

    Ok(())
}
