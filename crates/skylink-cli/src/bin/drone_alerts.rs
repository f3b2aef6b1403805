//! Per-drone ranked alert feed.
//!
//! Translates every plane detection into drone-readable alerts with
//! guidance, aggregates them per drone sorted by priority, prints the
//! per-level counts, and optionally exports the feed as JSON.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skylink_cli::{load, report};
use skylink_core::{aggregate_by_drone, DangerLadder, DangerLevel, DataSnapshot};

/// Build ranked, per-drone collision alerts from two CSV batches
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Aircraft states CSV (OpenSky live states export)
    #[arg(long)]
    planes: PathBuf,

    /// Drone telemetry CSV
    #[arg(long)]
    drones: PathBuf,

    /// Maximum distance in km still classified CRITICAL
    #[arg(long, default_value_t = 0.5)]
    critical_km: f64,

    /// Maximum distance in km still classified HIGH
    #[arg(long, default_value_t = 1.0)]
    high_km: f64,

    /// Maximum distance in km still classified MEDIUM
    #[arg(long, default_value_t = 2.0)]
    medium_km: f64,

    /// Maximum distance in km still classified LOW
    #[arg(long, default_value_t = 5.0)]
    low_km: f64,

    /// Directory for the JSON export; no file is written when absent
    #[arg(long)]
    out: Option<PathBuf>,
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
    let snapshot = DataSnapshot::from_records(aircraft_rows, drone_rows);

    let ladder = DangerLadder {
        critical_km: args.critical_km,
        high_km: args.high_km,
        medium_km: args.medium_km,
        low_km: args.low_km,
    };

    let summaries = aggregate_by_drone(&snapshot.drones, &snapshot.aircraft, &ladder);

    let count_at = |level: DangerLevel| {
        summaries
            .iter()
            .filter(|s| s.highest_priority == level)
            .count()
    };

    println!("Total drones evaluated: {}", summaries.len());
    println!("Critical alerts: {}", count_at(DangerLevel::Critical));
    println!("High alerts: {}", count_at(DangerLevel::High));
    println!("Medium alerts: {}", count_at(DangerLevel::Medium));
    println!("Low alerts: {}", count_at(DangerLevel::Low));
    println!("Safe: {}", count_at(DangerLevel::Safe));

    for summary in summaries.iter().filter(|s| s.alert_count > 0).take(5) {
        println!(
            "\nDrone {} at ({:.4}, {:.4}), {} m: {} alert(s), highest {}",
            summary.drone_id,
            summary.lat,
            summary.lon,
            summary.altitude_m,
            summary.alert_count,
            summary.highest_priority
        );
        for alert in summary.alerts.iter().take(2) {
            println!(
                "  [{}] {} at {:.2} km: {}",
                alert.danger_level,
                alert
                    .plane_info
                    .callsign
                    .as_deref()
                    .unwrap_or("Unknown"),
                alert.distance_km,
                alert.guidance
            );
        }
    }

    if let Some(dir) = &args.out {
        let path = report::write_drone_alerts(&summaries, dir)?;
        println!("\nAlerts written to {}", path.display());
    }

    Ok(())
}
