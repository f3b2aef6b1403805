//! CSV batch loading for the two input schemas.
//!
//! Schema validation happens here: a batch missing a required column is a
//! fatal [`SchemaError`] naming the missing field(s). Per-row problems
//! are not fatal; rows that fail to parse are kept as empty records so
//! they flow into the snapshot's row-skip accounting together with rows
//! that carry explicit nulls.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use skylink_core::{AircraftRecord, BatchKind, DroneRecord, SchemaError};

/// Load raw aircraft rows from an OpenSky-style live states export.
pub fn read_aircraft_csv(path: impl AsRef<Path>) -> Result<Vec<AircraftRecord>> {
    read_batch(path.as_ref(), BatchKind::Aircraft)
}

/// Load raw drone telemetry rows.
pub fn read_drone_csv(path: impl AsRef<Path>) -> Result<Vec<DroneRecord>> {
    read_batch(path.as_ref(), BatchKind::Drone)
}

fn read_batch<T>(path: &Path, kind: BatchKind) -> Result<Vec<T>>
where
    T: DeserializeOwned + Default,
{
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {} batch at {}", kind, path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read headers from {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    SchemaError::check_columns(kind, &headers)?;

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(err) => {
                // Header line is row 1
                tracing::warn!(row = idx + 2, error = %err, "unparseable {kind} row");
                records.push(T::default());
            }
        }
    }

    tracing::info!(rows = records.len(), path = %path.display(), "loaded {kind} batch");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylink_core::DataSnapshot;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp_csv(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("skylink-test-{}.csv", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_aircraft_batch_with_extra_columns() {
        let path = write_temp_csv(
            "icao24,callsign,origin_country,latitude,longitude,baro_altitude,on_ground,velocity\n\
             a835af,UAL123,United States,40.7128,-74.0060,250.0,False,120.5\n\
             ab12cd,,Canada,41.0,-73.5,300.0,False,\n",
        );
        let records = read_aircraft_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].icao24.as_deref(), Some("a835af"));
        assert_eq!(records[0].velocity, Some(120.5));
        assert_eq!(records[1].velocity, None);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        // No baro_altitude column at all
        let path = write_temp_csv(
            "icao24,callsign,latitude,longitude\n\
             a835af,UAL123,40.7128,-74.0060\n",
        );
        let err = read_aircraft_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        let schema = err.downcast_ref::<SchemaError>().expect("schema error");
        assert_eq!(schema.columns, vec!["baro_altitude"]);
    }

    #[test]
    fn rows_with_empty_mandatory_fields_reach_skip_accounting() {
        let path = write_temp_csv(
            "time_step,drone_id,latitude,longitude,altitude,speed,heading,timestamp\n\
             1,drone_1,40.7,-74.0,95.0,12.0,180.0,2025-10-12 12:00:00\n\
             1,drone_2,,-74.0,95.0,12.0,180.0,2025-10-12 12:00:00\n\
             1,,40.7,-74.0,95.0,12.0,180.0,2025-10-12 12:00:00\n",
        );
        let records = read_drone_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 3);
        let snapshot = DataSnapshot::from_records(Vec::new(), records);
        assert_eq!(snapshot.drones.len(), 1);
        assert_eq!(snapshot.skipped_drones, 2);
        assert_eq!(snapshot.drones[0].drone_id, "drone_1");
        assert!(snapshot.drones[0].timestamp.is_some());
    }

    #[test]
    fn unparseable_row_is_kept_as_empty_record() {
        let path = write_temp_csv(
            "time_step,drone_id,latitude,longitude,altitude,speed,heading,timestamp\n\
             1,drone_1,not-a-number,-74.0,95.0,12.0,180.0,\n\
             1,drone_2,40.7,-74.0,95.0,12.0,180.0,\n",
        );
        let records = read_drone_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        let snapshot = DataSnapshot::from_records(Vec::new(), records);
        assert_eq!(snapshot.drones.len(), 1);
        assert_eq!(snapshot.skipped_drones, 1);
    }
}
