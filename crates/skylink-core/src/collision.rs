//! Pairwise collision detection between aircraft and drones.
//!
//! Brute-force scan over the cross product of the two batches. Batch
//! sizes are bounded upstream by [`crate::rules::BatchFilter`], so the
//! O(planes x drones) cost stays acceptable; correctness of the scan is
//! the priority here, not scale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{new_alert_id, AircraftState, DataSnapshot, DroneState};
use crate::rules::SeparationRules;
use crate::spatial::{haversine_km, vertical_distance_m};

/// One aircraft/drone pair found inside both separation thresholds.
///
/// Derived value, computed fresh per detection run. `alert_id` is unique
/// per run but carries no identity beyond it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionAlert {
    pub alert_id: String,
    pub drone_id: String,
    pub icao24: String,
    pub callsign: Option<String>,
    /// Horizontal separation in kilometers, >= 0
    pub horizontal_km: f64,
    /// Vertical separation in meters, >= 0
    pub vertical_m: f64,
    pub drone_lat: f64,
    pub drone_lon: f64,
    pub drone_altitude_m: f64,
    pub plane_lat: f64,
    pub plane_lon: f64,
    pub plane_altitude_m: f64,
    pub drone_speed_mps: Option<f64>,
    pub plane_velocity_mps: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of one pairwise scan: the alerts plus the accounting callers
/// need for observability.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionReport {
    pub alerts: Vec<CollisionAlert>,
    /// Pairs actually compared.
    pub pairs_checked: usize,
    /// Pairs whose distance computation produced a non-finite value.
    pub pairs_skipped: usize,
    /// Rows dropped at snapshot build, echoed from the input.
    pub skipped_aircraft_rows: usize,
    pub skipped_drone_rows: usize,
}

/// Scan every (aircraft, drone) pair and emit an alert for each pair
/// within both thresholds at once (inclusive bounds on both).
///
/// Output order is insertion order over aircraft-then-drone iteration.
/// Either batch being empty yields an empty report, not an error. A pair
/// whose distance computes non-finite is skipped and counted; the scan
/// always completes.
pub fn detect_collisions(snapshot: &DataSnapshot, rules: &SeparationRules) -> DetectionReport {
    let mut report = DetectionReport {
        skipped_aircraft_rows: snapshot.skipped_aircraft,
        skipped_drone_rows: snapshot.skipped_drones,
        ..Default::default()
    };

    if snapshot.is_empty() {
        tracing::warn!("one or both input batches are empty");
        return report;
    }

    let now = Utc::now();

    for plane in &snapshot.aircraft {
        for drone in &snapshot.drones {
            report.pairs_checked += 1;

            let horizontal_km = haversine_km(plane.lat, plane.lon, drone.lat, drone.lon);
            let vertical_m = vertical_distance_m(plane.baro_altitude_m, drone.altitude_m);

            if !horizontal_km.is_finite() || !vertical_m.is_finite() {
                report.pairs_skipped += 1;
                tracing::warn!(
                    icao24 = %plane.icao24,
                    drone_id = %drone.drone_id,
                    "skipping pair with non-finite separation"
                );
                continue;
            }

            if horizontal_km <= rules.horizontal_km && vertical_m <= rules.vertical_m {
                report.alerts.push(CollisionAlert {
                    alert_id: new_alert_id(),
                    drone_id: drone.drone_id.clone(),
                    icao24: plane.icao24.clone(),
                    callsign: plane.callsign.clone(),
                    horizontal_km,
                    vertical_m,
                    drone_lat: drone.lat,
                    drone_lon: drone.lon,
                    drone_altitude_m: drone.altitude_m,
                    plane_lat: plane.lat,
                    plane_lon: plane.lon,
                    plane_altitude_m: plane.baro_altitude_m,
                    drone_speed_mps: drone.speed_mps,
                    plane_velocity_mps: plane.velocity_mps,
                    created_at: now,
                });
            }
        }
    }

    tracing::info!(
        alerts = report.alerts.len(),
        pairs_checked = report.pairs_checked,
        pairs_skipped = report.pairs_skipped,
        "collision detection complete"
    );

    report
}

/// Convenience wrapper for callers holding bare state slices.
pub fn detect_collisions_between(
    aircraft: &[AircraftState],
    drones: &[DroneState],
    rules: &SeparationRules,
) -> DetectionReport {
    let snapshot = DataSnapshot::from_states(aircraft.to_vec(), drones.to_vec());
    detect_collisions(&snapshot, rules)
}

/// Aggregate statistics over one batch of alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionSummary {
    pub total_alerts: usize,
    pub unique_drones: usize,
    pub unique_planes: usize,
    pub avg_horizontal_km: f64,
    pub avg_vertical_m: f64,
    pub min_horizontal_km: f64,
    pub min_vertical_m: f64,
}

/// Summarize a batch of alerts.
///
/// Empty input yields the all-zero summary (never NaN) so display code
/// does not need to special-case it.
pub fn summarize(alerts: &[CollisionAlert]) -> CollisionSummary {
    if alerts.is_empty() {
        return CollisionSummary::default();
    }

    let count = alerts.len() as f64;
    let unique_drones = alerts
        .iter()
        .map(|a| a.drone_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let unique_planes = alerts
        .iter()
        .map(|a| a.icao24.as_str())
        .collect::<HashSet<_>>()
        .len();

    let sum_h: f64 = alerts.iter().map(|a| a.horizontal_km).sum();
    let sum_v: f64 = alerts.iter().map(|a| a.vertical_m).sum();
    let min_h = alerts
        .iter()
        .map(|a| a.horizontal_km)
        .fold(f64::INFINITY, f64::min);
    let min_v = alerts
        .iter()
        .map(|a| a.vertical_m)
        .fold(f64::INFINITY, f64::min);

    CollisionSummary {
        total_alerts: alerts.len(),
        unique_drones,
        unique_planes,
        avg_horizontal_km: sum_h / count,
        avg_vertical_m: sum_v / count,
        min_horizontal_km: min_h,
        min_vertical_m: min_v,
    }
}
