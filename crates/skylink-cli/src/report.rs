//! JSON export of detection results.
//!
//! Display rounding lives here, at the serialization boundary: horizontal
//! distances to 3 decimals of a kilometer, vertical to 2 decimals of a
//! meter. Core values stay unrounded.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Value};

use skylink_core::{CollisionAlert, CollisionSummary, DetectionReport, DroneAlertSummary};

/// Round a kilometer distance to 3 decimals for display.
pub fn round_km(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Round a meter distance to 2 decimals for display.
pub fn round_m(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn alert_json(alert: &CollisionAlert) -> Value {
    json!({
        "alert_id": alert.alert_id,
        "drone_id": alert.drone_id,
        "plane_icao24": alert.icao24,
        "callsign": alert.callsign,
        "horizontal_distance_km": round_km(alert.horizontal_km),
        "vertical_distance_m": round_m(alert.vertical_m),
        "drone_lat": alert.drone_lat,
        "drone_lon": alert.drone_lon,
        "drone_altitude_m": alert.drone_altitude_m,
        "plane_lat": alert.plane_lat,
        "plane_lon": alert.plane_lon,
        "plane_altitude_m": alert.plane_altitude_m,
        "drone_speed_mps": alert.drone_speed_mps,
        "plane_velocity_mps": alert.plane_velocity_mps,
        "created_at": alert.created_at,
    })
}

fn summary_json(summary: &CollisionSummary) -> Value {
    json!({
        "total_alerts": summary.total_alerts,
        "unique_drones": summary.unique_drones,
        "unique_planes": summary.unique_planes,
        "avg_horizontal_km": round_km(summary.avg_horizontal_km),
        "avg_vertical_m": round_m(summary.avg_vertical_m),
        "min_horizontal_km": round_km(summary.min_horizontal_km),
        "min_vertical_m": round_m(summary.min_vertical_m),
    })
}

fn timestamped(prefix: &str) -> String {
    format!("{prefix}_{}.json", Utc::now().format("%Y%m%d_%H%M%S"))
}

fn write_json(dir: &Path, filename: String, value: &Value) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(filename);
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(&path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(path)
}

/// Write a pairwise scan's alerts and statistics to a timestamped JSON
/// file under `dir`. Returns the path written.
pub fn write_collision_report(
    report: &DetectionReport,
    summary: &CollisionSummary,
    dir: &Path,
) -> Result<PathBuf> {
    let value = json!({
        "generated_at": Utc::now(),
        "summary": summary_json(summary),
        "pairs_checked": report.pairs_checked,
        "pairs_skipped": report.pairs_skipped,
        "skipped_aircraft_rows": report.skipped_aircraft_rows,
        "skipped_drone_rows": report.skipped_drone_rows,
        "alerts": report.alerts.iter().map(alert_json).collect::<Vec<_>>(),
    });
    write_json(dir, timestamped("collision_alerts"), &value)
}

/// Write per-drone ranked alert summaries to a timestamped JSON file
/// under `dir`. Returns the path written.
pub fn write_drone_alerts(summaries: &[DroneAlertSummary], dir: &Path) -> Result<PathBuf> {
    let value = serde_json::to_value(summaries)?;
    let value = round_drone_alert_distances(value);
    write_json(dir, timestamped("drone_alerts"), &value)
}

// Drone alert summaries serialize straight from the core types; only the
// per-alert distance needs display rounding (2 decimals of a km).
fn round_drone_alert_distances(mut value: Value) -> Value {
    if let Some(summaries) = value.as_array_mut() {
        for summary in summaries {
            if let Some(alerts) = summary.get_mut("alerts").and_then(Value::as_array_mut) {
                for alert in alerts {
                    if let Some(distance) = alert.get("distance_km").and_then(Value::as_f64) {
                        alert["distance_km"] = json!(round_m(distance));
                    }
                }
            }
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylink_core::{
        aggregate_by_drone, detect_collisions, AircraftState, DangerLadder, DataSnapshot,
        DroneState, SeparationRules,
    };

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("skylink-report-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn rounding_matches_display_precision() {
        assert_eq!(round_km(0.123456), 0.123);
        assert_eq!(round_km(0.0006976), 0.001);
        assert_eq!(round_m(10.018), 10.02);
        assert_eq!(round_m(10.0), 10.0);
    }

    #[test]
    fn collision_report_round_trips_as_json() {
        let snapshot = DataSnapshot::from_states(
            vec![AircraftState::new("a835af", 40.7128, -74.0060, 200.0)],
            vec![DroneState::new("drone_1", 40.71285, -74.00605, 190.0)],
        );
        let report = detect_collisions(&snapshot, &SeparationRules::default());
        let summary = skylink_core::summarize(&report.alerts);

        let dir = temp_dir();
        let path = write_collision_report(&report, &summary, &dir).unwrap();
        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(value["summary"]["total_alerts"], 1);
        let alert = &value["alerts"][0];
        assert_eq!(alert["drone_id"], "drone_1");
        // 3 decimals of a km: ~7m separation shows as 0.007
        assert_eq!(alert["horizontal_distance_km"], 0.007);
        assert_eq!(alert["vertical_distance_m"], 10.0);
    }

    #[test]
    fn drone_alert_export_rounds_distances() {
        let drones = vec![DroneState::new("drone_1", 40.0, -74.0, 100.0)];
        let aircraft = vec![AircraftState::new("ac01", 40.001, -74.001, 120.0)];
        let summaries = aggregate_by_drone(&drones, &aircraft, &DangerLadder::default());

        let dir = temp_dir();
        let path = write_drone_alerts(&summaries, &dir).unwrap();
        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_dir_all(&dir).ok();

        let distance = value[0]["alerts"][0]["distance_km"].as_f64().unwrap();
        // Two decimal places at most
        assert!((distance * 100.0).fract().abs() < 1e-9);
        assert_eq!(value[0]["highest_priority"], "CRITICAL");
    }
}
