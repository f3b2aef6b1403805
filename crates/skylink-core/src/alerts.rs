//! Danger classification and per-drone alert aggregation.
//!
//! This path classifies by horizontal distance alone, on a fixed ladder of
//! thresholds. It is deliberately independent of the dual-threshold
//! pairwise detector in [`crate::collision`]: the two are separate, named
//! policies and are never merged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{new_alert_id, AircraftState, DroneState};
use crate::spatial::haversine_km;

/// Discrete severity bucket, ordered most severe first.
///
/// The derived ordering follows priority rank: `Critical` sorts before
/// `High`, and so on down to `Safe`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DangerLevel {
    Critical,
    High,
    Medium,
    Low,
    Safe,
}

impl DangerLevel {
    /// Priority rank for alert sorting. 1 = most severe, 5 = safe.
    pub fn priority(&self) -> u8 {
        match self {
            DangerLevel::Critical => 1,
            DangerLevel::High => 2,
            DangerLevel::Medium => 3,
            DangerLevel::Low => 4,
            DangerLevel::Safe => 5,
        }
    }

    /// Guidance text shown to the drone operator.
    pub fn guidance(&self) -> &'static str {
        match self {
            DangerLevel::Critical => {
                "IMMEDIATE ACTION REQUIRED: Descend to safe altitude and move away from flight path!"
            }
            DangerLevel::High => {
                "HIGH ALERT: Adjust altitude and maintain safe distance from aircraft"
            }
            DangerLevel::Medium => {
                "CAUTION: Monitor aircraft movement and be prepared to take evasive action"
            }
            DangerLevel::Low => "ADVISORY: Aircraft detected in area, maintain awareness",
            DangerLevel::Safe => "CLEAR: No immediate threats detected",
        }
    }

    /// Display color for dashboards.
    pub fn color_code(&self) -> &'static str {
        match self {
            DangerLevel::Critical => "#FF0000",
            DangerLevel::High => "#FF6600",
            DangerLevel::Medium => "#FFFF00",
            DangerLevel::Low => "#00FF00",
            DangerLevel::Safe => "#00AA00",
        }
    }
}

impl std::fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DangerLevel::Critical => "CRITICAL",
            DangerLevel::High => "HIGH",
            DangerLevel::Medium => "MEDIUM",
            DangerLevel::Low => "LOW",
            DangerLevel::Safe => "SAFE",
        };
        write!(f, "{label}")
    }
}

/// Ascending threshold ladder mapping horizontal distance to a danger
/// level. Each bound is the maximum qualifying distance (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DangerLadder {
    pub critical_km: f64,
    pub high_km: f64,
    pub medium_km: f64,
    pub low_km: f64,
}

impl Default for DangerLadder {
    fn default() -> Self {
        Self {
            critical_km: 0.5,
            high_km: 1.0,
            medium_km: 2.0,
            low_km: 5.0,
        }
    }
}

impl DangerLadder {
    /// Classify a horizontal distance against the ladder.
    pub fn classify(&self, distance_km: f64) -> DangerLevel {
        if distance_km <= self.critical_km {
            DangerLevel::Critical
        } else if distance_km <= self.high_km {
            DangerLevel::High
        } else if distance_km <= self.medium_km {
            DangerLevel::Medium
        } else if distance_km <= self.low_km {
            DangerLevel::Low
        } else {
            DangerLevel::Safe
        }
    }
}

/// Aircraft details echoed into a drone-readable alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPlaneInfo {
    pub callsign: Option<String>,
    pub altitude_m: f64,
    pub speed_mps: Option<f64>,
    pub heading_deg: Option<f64>,
}

/// Drone details echoed into a drone-readable alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDroneInfo {
    pub drone_id: String,
    pub altitude_m: f64,
    pub lat: f64,
    pub lon: f64,
}

/// One plane detection translated into a drone-readable alert with
/// guidance and prioritization.
///
/// Serialize-only: alerts are derived values, produced here and consumed
/// by presentation layers, never read back.
#[derive(Debug, Clone, Serialize)]
pub struct DroneAlert {
    pub alert_id: String,
    pub created_at: DateTime<Utc>,
    pub danger_level: DangerLevel,
    pub distance_km: f64,
    pub plane_info: AlertPlaneInfo,
    pub drone_info: AlertDroneInfo,
    pub guidance: &'static str,
    pub priority: u8,
    pub color_code: &'static str,
}

/// All alerts for one drone in one run, ranked by priority.
#[derive(Debug, Clone, Serialize)]
pub struct DroneAlertSummary {
    pub drone_id: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    /// Sorted by non-decreasing priority; ties keep evaluation order.
    pub alerts: Vec<DroneAlert>,
    pub alert_count: usize,
    /// Level of `alerts[0]` when non-empty, else `Safe`.
    pub highest_priority: DangerLevel,
}

/// Translate one plane detection into an alert for one drone.
///
/// Always returns an alert, including `Safe` ones; aggregation decides
/// what to keep.
pub fn translate_alert(
    plane: &AircraftState,
    drone: &DroneState,
    ladder: &DangerLadder,
) -> DroneAlert {
    let distance_km = haversine_km(plane.lat, plane.lon, drone.lat, drone.lon);
    let danger_level = ladder.classify(distance_km);

    DroneAlert {
        alert_id: new_alert_id(),
        created_at: Utc::now(),
        danger_level,
        distance_km,
        plane_info: AlertPlaneInfo {
            callsign: plane.callsign.clone(),
            altitude_m: plane.baro_altitude_m,
            speed_mps: plane.velocity_mps,
            heading_deg: plane.heading_deg,
        },
        drone_info: AlertDroneInfo {
            drone_id: drone.drone_id.clone(),
            altitude_m: drone.altitude_m,
            lat: drone.lat,
            lon: drone.lon,
        },
        guidance: danger_level.guidance(),
        priority: danger_level.priority(),
        color_code: danger_level.color_code(),
    }
}

/// Evaluate every aircraft against every drone and build one ranked
/// summary per drone.
///
/// `Safe` results are dropped; the rest are stable-sorted by priority
/// ascending. Output summaries follow input drone order, one per drone
/// even when it has no alerts.
pub fn aggregate_by_drone(
    drones: &[DroneState],
    aircraft: &[AircraftState],
    ladder: &DangerLadder,
) -> Vec<DroneAlertSummary> {
    drones
        .iter()
        .map(|drone| {
            let mut alerts: Vec<DroneAlert> = aircraft
                .iter()
                .map(|plane| translate_alert(plane, drone, ladder))
                .filter(|alert| alert.danger_level != DangerLevel::Safe)
                .collect();

            alerts.sort_by_key(|alert| alert.priority);

            let highest_priority = alerts
                .first()
                .map(|alert| alert.danger_level)
                .unwrap_or(DangerLevel::Safe);

            DroneAlertSummary {
                drone_id: drone.drone_id.clone(),
                lat: drone.lat,
                lon: drone.lon,
                altitude_m: drone.altitude_m,
                alert_count: alerts.len(),
                highest_priority,
                alerts,
            }
        })
        .collect()
}
