//! Tiered multi-threshold threat detection.
//!
//! Runs the pairwise separation test once per tier, most severe first.
//! The first tier to claim a drone id wins; a drone classified at tier N
//! is never re-reported at a looser tier, so every candidate carries its
//! worst-case classification exactly once.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{AircraftState, DroneState};
use crate::spatial::{bearing_deg, compass_point, haversine_km, vertical_distance_m};

/// One threshold level in a tier ladder, most severe tiers first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatTier {
    pub name: String,
    pub horizontal_km: f64,
    pub vertical_m: f64,
}

impl ThreatTier {
    pub fn new(name: impl Into<String>, horizontal_km: f64, vertical_m: f64) -> Self {
        Self {
            name: name.into(),
            horizontal_km,
            vertical_m,
        }
    }

    /// Standard four-level ladder.
    pub fn standard() -> Vec<ThreatTier> {
        vec![
            ThreatTier::new("critical", 0.1, 30.0),
            ThreatTier::new("high", 0.3, 50.0),
            ThreatTier::new("medium", 0.5, 100.0),
            ThreatTier::new("low", 1.0, 150.0),
        ]
    }

    /// Wider five-level ladder for live traffic, with an advisory band.
    pub fn enhanced() -> Vec<ThreatTier> {
        vec![
            ThreatTier::new("critical", 0.05, 25.0),
            ThreatTier::new("high", 0.2, 40.0),
            ThreatTier::new("medium", 0.4, 75.0),
            ThreatTier::new("low", 0.8, 120.0),
            ThreatTier::new("advisory", 1.5, 200.0),
        ]
    }
}

/// A drone classified against one aircraft's tier ladder.
#[derive(Debug, Clone, Serialize)]
pub struct Threat {
    pub drone_id: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    pub horizontal_km: f64,
    pub vertical_m: f64,
    /// Name of the claiming tier.
    pub tier: String,
    /// Index of the claiming tier in the ladder, 0 = most severe.
    pub severity: usize,
    /// Bearing from the aircraft to the drone, degrees.
    pub bearing_deg: f64,
    /// Eight-point compass form of the bearing.
    pub relative_position: &'static str,
    pub speed_mps: Option<f64>,
    pub heading_deg: Option<f64>,
}

/// Classify every candidate drone against an aircraft's tier ladder.
///
/// `tiers` must be ordered most to least severe; the first-match-wins
/// merge depends on it. Output is sorted by (tier severity, horizontal
/// distance). Candidates whose separation computes non-finite are
/// skipped.
pub fn detect_tiered(
    aircraft: &AircraftState,
    candidates: &[DroneState],
    tiers: &[ThreatTier],
) -> Vec<Threat> {
    let mut threats: Vec<Threat> = Vec::new();
    let mut claimed: HashSet<&str> = HashSet::new();

    for (severity, tier) in tiers.iter().enumerate() {
        for drone in candidates {
            if claimed.contains(drone.drone_id.as_str()) {
                continue;
            }

            let horizontal_km = haversine_km(aircraft.lat, aircraft.lon, drone.lat, drone.lon);
            let vertical_m = vertical_distance_m(aircraft.baro_altitude_m, drone.altitude_m);
            if !horizontal_km.is_finite() || !vertical_m.is_finite() {
                continue;
            }

            if horizontal_km <= tier.horizontal_km && vertical_m <= tier.vertical_m {
                let bearing = bearing_deg(aircraft.lat, aircraft.lon, drone.lat, drone.lon);
                claimed.insert(drone.drone_id.as_str());
                threats.push(Threat {
                    drone_id: drone.drone_id.clone(),
                    lat: drone.lat,
                    lon: drone.lon,
                    altitude_m: drone.altitude_m,
                    horizontal_km,
                    vertical_m,
                    tier: tier.name.clone(),
                    severity,
                    bearing_deg: bearing,
                    relative_position: compass_point(bearing),
                    speed_mps: drone.speed_mps,
                    heading_deg: drone.heading_deg,
                });
            }
        }
    }

    threats.sort_by(|a, b| {
        a.severity.cmp(&b.severity).then(
            a.horizontal_km
                .partial_cmp(&b.horizontal_km)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    tracing::debug!(
        icao24 = %aircraft.icao24,
        threats = threats.len(),
        candidates = candidates.len(),
        "tiered threat detection complete"
    );

    threats
}
