//! Tiered threat board for one aircraft.
//!
//! Selects a single aircraft from the batch, keeps drones within a range
//! ring, and classifies each against the tier ladder. Mirrors what a
//! cockpit radar display consumes: worst-case classification per drone,
//! with bearing and relative position.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skylink_cli::load;
use skylink_core::spatial::{haversine_km, KM_PER_NM};
use skylink_core::{detect_tiered, DataSnapshot, DroneState, ThreatTier};

/// Classify drone threats around one aircraft using a tier ladder
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Aircraft states CSV (OpenSky live states export)
    #[arg(long)]
    planes: PathBuf,

    /// Drone telemetry CSV
    #[arg(long)]
    drones: PathBuf,

    /// ICAO24 address of the aircraft to evaluate
    #[arg(long)]
    icao24: String,

    /// Candidate search radius in nautical miles
    #[arg(long, default_value_t = 10.0)]
    range_nm: f64,

    /// Use the wider five-level ladder with an advisory band
    #[arg(long)]
    enhanced: bool,

    /// File for the JSON threat export; no file is written when absent
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

    let Some(aircraft) = snapshot.aircraft.iter().find(|a| a.icao24 == args.icao24) else {
        bail!("aircraft {} not found in batch", args.icao24);
    };

    let range_km = args.range_nm * KM_PER_NM;
    let candidates: Vec<DroneState> = snapshot
        .drones
        .iter()
        .filter(|d| haversine_km(aircraft.lat, aircraft.lon, d.lat, d.lon) <= range_km)
        .cloned()
        .collect();

    tracing::info!(
        icao24 = %aircraft.icao24,
        candidates = candidates.len(),
        range_nm = args.range_nm,
        "evaluating drone threats"
    );

    let tiers = if args.enhanced {
        ThreatTier::enhanced()
    } else {
        ThreatTier::standard()
    };
    let threats = detect_tiered(aircraft, &candidates, &tiers);

    println!(
        "{}: {} threat(s) within {} NM",
        aircraft.callsign.as_deref().unwrap_or(&aircraft.icao24),
        threats.len(),
        args.range_nm
    );
    for threat in &threats {
        println!(
            "  {}: {} at {:.3} km / {:.0} m vertical, {} ({:.0} deg)",
            threat.tier.to_uppercase(),
            threat.drone_id,
            threat.horizontal_km,
            threat.vertical_m,
            threat.relative_position,
            threat.bearing_deg
        );
    }

    if let Some(path) = &args.out {
        std::fs::write(path, serde_json::to_string_pretty(&threats)?)?;
        println!("Threats written to {}", path.display());
    }

    Ok(())
}
