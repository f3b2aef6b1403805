//! Core data models for the SkyLink system.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// State vector for one aircraft, as reported by an ADS-B feed.
///
/// Mandatory fields are validated at construction; a state that exists is
/// always usable by the detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftState {
    /// ICAO 24-bit address or tail identifier. Unique within a batch,
    /// not guaranteed globally unique.
    pub icao24: String,
    pub callsign: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Barometric altitude in meters. May be negative near sea level.
    pub baro_altitude_m: f64,
    #[serde(default)]
    pub velocity_mps: Option<f64>,
    #[serde(default)]
    pub heading_deg: Option<f64>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

/// Telemetry snapshot for one drone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneState {
    pub drone_id: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    #[serde(default)]
    pub speed_mps: Option<f64>,
    #[serde(default)]
    pub heading_deg: Option<f64>,
    #[serde(default)]
    pub time_step: Option<u32>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Raw aircraft row as it arrives from a tabular source.
///
/// Every mandatory field is optional here; [`AircraftState::from_record`]
/// decides whether the row survives. Field names follow the OpenSky live
/// states export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AircraftRecord {
    #[serde(default)]
    pub icao24: Option<String>,
    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub baro_altitude: Option<f64>,
    #[serde(default)]
    pub velocity: Option<f64>,
    #[serde(default)]
    pub true_track: Option<f64>,
}

/// Raw drone telemetry row as it arrives from a tabular source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DroneRecord {
    #[serde(default)]
    pub time_step: Option<u32>,
    #[serde(default)]
    pub drone_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub heading: Option<f64>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Accept RFC 3339 or the `YYYY-MM-DD HH:MM:SS` form drone telemetry
/// exports use. An unparseable timestamp becomes `None` rather than
/// killing the row; the field is optional data.
fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(Utc.from_utc_datetime(&naive)));
    }
    Ok(None)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl AircraftState {
    /// Build a validated state from a raw row.
    ///
    /// Returns `None` when any mandatory field (icao24, latitude,
    /// longitude, barometric altitude) is absent or non-finite. Callers
    /// count rejected rows; see [`DataSnapshot::from_records`].
    pub fn from_record(record: AircraftRecord) -> Option<Self> {
        Some(Self {
            icao24: non_empty(record.icao24)?,
            callsign: non_empty(record.callsign),
            lat: finite(record.latitude)?,
            lon: finite(record.longitude)?,
            baro_altitude_m: finite(record.baro_altitude)?,
            velocity_mps: finite(record.velocity),
            heading_deg: finite(record.true_track),
            origin_country: non_empty(record.origin_country),
        })
    }

    /// Create a new state with only required fields.
    pub fn new(icao24: impl Into<String>, lat: f64, lon: f64, baro_altitude_m: f64) -> Self {
        Self {
            icao24: icao24.into(),
            callsign: None,
            lat,
            lon,
            baro_altitude_m,
            velocity_mps: None,
            heading_deg: None,
            origin_country: None,
        }
    }

    /// Set callsign.
    pub fn with_callsign(mut self, callsign: impl Into<String>) -> Self {
        self.callsign = Some(callsign.into());
        self
    }
}

impl DroneState {
    /// Build a validated state from a raw row.
    ///
    /// Returns `None` when any mandatory field (drone_id, latitude,
    /// longitude, altitude) is absent or non-finite.
    pub fn from_record(record: DroneRecord) -> Option<Self> {
        Some(Self {
            drone_id: non_empty(record.drone_id)?,
            lat: finite(record.latitude)?,
            lon: finite(record.longitude)?,
            altitude_m: finite(record.altitude)?,
            speed_mps: finite(record.speed),
            heading_deg: finite(record.heading),
            time_step: record.time_step,
            timestamp: record.timestamp,
        })
    }

    /// Create a new state with only required fields.
    pub fn new(drone_id: impl Into<String>, lat: f64, lon: f64, altitude_m: f64) -> Self {
        Self {
            drone_id: drone_id.into(),
            lat,
            lon,
            altitude_m,
            speed_mps: None,
            heading_deg: None,
            time_step: None,
            timestamp: None,
        }
    }
}

/// Immutable pair of cleaned input batches handed to the detectors.
///
/// Built once per run from raw rows; rows missing a mandatory field are
/// dropped here and counted, so every downstream comparison operates on
/// fully-populated states. Detection functions take the snapshot by
/// reference and never mutate it, which keeps them reentrant.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DataSnapshot {
    pub aircraft: Vec<AircraftState>,
    pub drones: Vec<DroneState>,
    /// Aircraft rows rejected for a missing or non-finite mandatory field.
    pub skipped_aircraft: usize,
    /// Drone rows rejected for a missing or non-finite mandatory field.
    pub skipped_drones: usize,
}

impl DataSnapshot {
    /// Clean raw rows into a snapshot, dropping and counting rows with a
    /// null/NaN mandatory field. Row order is preserved.
    pub fn from_records(
        aircraft_rows: Vec<AircraftRecord>,
        drone_rows: Vec<DroneRecord>,
    ) -> Self {
        let aircraft_total = aircraft_rows.len();
        let drone_total = drone_rows.len();

        let aircraft: Vec<AircraftState> = aircraft_rows
            .into_iter()
            .filter_map(AircraftState::from_record)
            .collect();
        let drones: Vec<DroneState> = drone_rows
            .into_iter()
            .filter_map(DroneState::from_record)
            .collect();

        let skipped_aircraft = aircraft_total - aircraft.len();
        let skipped_drones = drone_total - drones.len();

        if skipped_aircraft > 0 || skipped_drones > 0 {
            tracing::info!(
                skipped_aircraft,
                skipped_drones,
                "dropped rows with missing mandatory fields"
            );
        }

        Self {
            aircraft,
            drones,
            skipped_aircraft,
            skipped_drones,
        }
    }

    /// Build a snapshot from already-validated states.
    pub fn from_states(aircraft: Vec<AircraftState>, drones: Vec<DroneState>) -> Self {
        Self {
            aircraft,
            drones,
            skipped_aircraft: 0,
            skipped_drones: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty() || self.drones.is_empty()
    }
}

/// Generate a display identifier for an alert: `ALERT-` plus the first
/// eight hex characters of a v4 UUID, uppercased.
///
/// Unique per call, unlike a timestamp-derived id, and safe to use as a
/// key within a run.
pub fn new_alert_id() -> String {
    format!("ALERT-{}", uuid::Uuid::new_v4().to_string()[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aircraft_record_with_all_mandatory_fields_survives() {
        let record = AircraftRecord {
            icao24: Some("abc123".into()),
            callsign: Some("UAL123 ".into()),
            latitude: Some(40.7),
            longitude: Some(-74.0),
            baro_altitude: Some(300.0),
            velocity: Some(120.0),
            ..Default::default()
        };
        let state = AircraftState::from_record(record).expect("valid row");
        assert_eq!(state.icao24, "abc123");
        // Callsigns arrive padded in OpenSky exports
        assert_eq!(state.callsign.as_deref(), Some("UAL123"));
        assert_eq!(state.velocity_mps, Some(120.0));
    }

    #[test]
    fn aircraft_record_missing_latitude_is_rejected() {
        let record = AircraftRecord {
            icao24: Some("abc123".into()),
            longitude: Some(-74.0),
            baro_altitude: Some(300.0),
            ..Default::default()
        };
        assert!(AircraftState::from_record(record).is_none());
    }

    #[test]
    fn nan_mandatory_field_is_rejected() {
        let record = DroneRecord {
            drone_id: Some("drone_1".into()),
            latitude: Some(f64::NAN),
            longitude: Some(-74.0),
            altitude: Some(100.0),
            ..Default::default()
        };
        assert!(DroneState::from_record(record).is_none());
    }

    #[test]
    fn optional_non_finite_fields_become_none() {
        let record = DroneRecord {
            drone_id: Some("drone_1".into()),
            latitude: Some(40.7),
            longitude: Some(-74.0),
            altitude: Some(100.0),
            speed: Some(f64::NAN),
            ..Default::default()
        };
        let state = DroneState::from_record(record).expect("valid row");
        assert_eq!(state.speed_mps, None);
    }

    #[test]
    fn snapshot_counts_skipped_rows() {
        // 10 aircraft rows, 2 with null latitude
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(AircraftRecord {
                icao24: Some(format!("ac{i:02}")),
                latitude: if i < 2 { None } else { Some(40.0 + i as f64 * 0.01) },
                longitude: Some(-74.0),
                baro_altitude: Some(250.0),
                ..Default::default()
            });
        }
        let snapshot = DataSnapshot::from_records(rows, Vec::new());
        assert_eq!(snapshot.aircraft.len(), 8);
        assert_eq!(snapshot.skipped_aircraft, 2);
        assert_eq!(snapshot.skipped_drones, 0);
    }

    #[test]
    fn drone_timestamp_accepts_plain_datetime_form() {
        let record: DroneRecord = serde_json::from_str(
            r#"{"drone_id":"drone_1","latitude":40.0,"longitude":-74.0,"altitude":90.0,"timestamp":"2025-10-12 12:00:00"}"#,
        )
        .unwrap();
        assert!(record.timestamp.is_some());

        let record: DroneRecord = serde_json::from_str(
            r#"{"drone_id":"drone_1","latitude":40.0,"longitude":-74.0,"altitude":90.0,"timestamp":"not a time"}"#,
        )
        .unwrap();
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn alert_ids_are_unique_across_rapid_calls() {
        let a = new_alert_id();
        let b = new_alert_id();
        assert!(a.starts_with("ALERT-"));
        assert_eq!(a.len(), "ALERT-".len() + 8);
        assert_ne!(a, b);
    }
}
