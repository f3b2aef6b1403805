//! Separation thresholds and batch filtering rules.

use serde::{Deserialize, Serialize};

use crate::models::{AircraftState, DataSnapshot, DroneState};

/// Separation thresholds for the pairwise detector.
///
/// A pair is an alert when it violates both thresholds at once
/// (inclusive bounds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeparationRules {
    /// Horizontal separation threshold in kilometers
    pub horizontal_km: f64,
    /// Vertical separation threshold in meters
    pub vertical_m: f64,
}

impl Default for SeparationRules {
    fn default() -> Self {
        Self {
            horizontal_km: 0.5,
            vertical_m: 100.0,
        }
    }
}

impl SeparationRules {
    pub fn new(horizontal_km: f64, vertical_m: f64) -> Self {
        Self {
            horizontal_km,
            vertical_m,
        }
    }
}

/// Geographic bounding box for pre-detection batch pruning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Altitude band for pre-detection batch pruning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeRange {
    pub min_m: f64,
    pub max_m: f64,
}

impl AltitudeRange {
    pub fn contains(&self, altitude_m: f64) -> bool {
        (self.min_m..=self.max_m).contains(&altitude_m)
    }
}

/// Optional upstream filters applied to a snapshot before detection.
///
/// The detectors themselves stay brute-force; bounding the batches is how
/// total pair count is kept in check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchFilter {
    pub bounds: Option<GeoBounds>,
    pub altitude: Option<AltitudeRange>,
}

impl BatchFilter {
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none() && self.altitude.is_none()
    }

    fn keep(&self, lat: f64, lon: f64, altitude_m: f64) -> bool {
        if let Some(bounds) = &self.bounds {
            if !bounds.contains(lat, lon) {
                return false;
            }
        }
        if let Some(altitude) = &self.altitude {
            if !altitude.contains(altitude_m) {
                return false;
            }
        }
        true
    }

    pub fn retain_aircraft(&self, aircraft: &mut Vec<AircraftState>) {
        aircraft.retain(|a| self.keep(a.lat, a.lon, a.baro_altitude_m));
    }

    pub fn retain_drones(&self, drones: &mut Vec<DroneState>) {
        drones.retain(|d| self.keep(d.lat, d.lon, d.altitude_m));
    }

    /// Apply both filters to a snapshot, returning the pruned snapshot.
    /// Skip counts from the original snapshot are preserved.
    pub fn apply(&self, mut snapshot: DataSnapshot) -> DataSnapshot {
        if self.is_empty() {
            return snapshot;
        }
        let before_aircraft = snapshot.aircraft.len();
        let before_drones = snapshot.drones.len();
        self.retain_aircraft(&mut snapshot.aircraft);
        self.retain_drones(&mut snapshot.drones);
        tracing::debug!(
            filtered_aircraft = before_aircraft - snapshot.aircraft.len(),
            filtered_drones = before_drones - snapshot.drones.len(),
            "applied batch filter"
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DataSnapshot {
        DataSnapshot::from_states(
            vec![
                AircraftState::new("ac01", 40.5, -74.0, 300.0),
                AircraftState::new("ac02", 42.0, -74.0, 300.0),
                AircraftState::new("ac03", 40.5, -74.0, 5000.0),
            ],
            vec![
                DroneState::new("drone_1", 40.5, -74.0, 100.0),
                DroneState::new("drone_2", 40.5, -80.0, 100.0),
            ],
        )
    }

    #[test]
    fn empty_filter_is_identity() {
        let filtered = BatchFilter::default().apply(snapshot());
        assert_eq!(filtered.aircraft.len(), 3);
        assert_eq!(filtered.drones.len(), 2);
    }

    #[test]
    fn bounds_filter_prunes_out_of_box_entities() {
        let filter = BatchFilter {
            bounds: Some(GeoBounds {
                min_lat: 40.0,
                max_lat: 41.0,
                min_lon: -75.0,
                max_lon: -73.0,
            }),
            altitude: None,
        };
        let filtered = filter.apply(snapshot());
        assert_eq!(filtered.aircraft.len(), 2); // ac02 is north of the box
        assert_eq!(filtered.drones.len(), 1); // drone_2 is west of the box
    }

    #[test]
    fn altitude_filter_prunes_high_traffic() {
        let filter = BatchFilter {
            bounds: None,
            altitude: Some(AltitudeRange {
                min_m: 0.0,
                max_m: 1000.0,
            }),
        };
        let filtered = filter.apply(snapshot());
        assert_eq!(filtered.aircraft.len(), 2); // ac03 cruises above the band
        assert_eq!(filtered.drones.len(), 2);
    }

    #[test]
    fn boundary_values_are_inclusive() {
        let range = AltitudeRange {
            min_m: 0.0,
            max_m: 1000.0,
        };
        assert!(range.contains(0.0));
        assert!(range.contains(1000.0));
        assert!(!range.contains(1000.1));
    }
}
