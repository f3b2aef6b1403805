//! Error taxonomy for batch ingestion and detection.
//!
//! Only one condition is fatal for a call: an input batch that lacks a
//! required column entirely. Per-row nulls and per-pair computation
//! failures are recovered locally and surfaced as counts, never as
//! errors.

use std::fmt;

use thiserror::Error;

/// Which input batch an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Aircraft,
    Drone,
}

impl BatchKind {
    /// Mandatory columns for this batch's schema.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            BatchKind::Aircraft => &["icao24", "latitude", "longitude", "baro_altitude"],
            BatchKind::Drone => &["drone_id", "latitude", "longitude", "altitude"],
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchKind::Aircraft => write!(f, "aircraft"),
            BatchKind::Drone => write!(f, "drone"),
        }
    }
}

/// A required column is absent from an input batch entirely.
///
/// Distinct from a per-row null: with no column there is nothing to scan,
/// so the call fails and names every missing field.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{entity} batch is missing required columns: {}", .columns.join(", "))]
pub struct SchemaError {
    pub entity: BatchKind,
    pub columns: Vec<String>,
}

impl SchemaError {
    /// Check `headers` against the batch's required columns. Returns the
    /// error naming every missing column, or `Ok` when the schema holds.
    pub fn check_columns<S: AsRef<str>>(entity: BatchKind, headers: &[S]) -> Result<(), SchemaError> {
        let missing: Vec<String> = entity
            .required_columns()
            .iter()
            .filter(|required| !headers.iter().any(|h| h.as_ref() == **required))
            .map(|c| c.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError {
                entity,
                columns: missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_headers_pass() {
        let headers = ["icao24", "callsign", "latitude", "longitude", "baro_altitude"];
        assert!(SchemaError::check_columns(BatchKind::Aircraft, &headers).is_ok());
    }

    #[test]
    fn missing_columns_are_all_named() {
        let headers = ["drone_id", "latitude"];
        let err = SchemaError::check_columns(BatchKind::Drone, &headers).unwrap_err();
        assert_eq!(err.columns, vec!["longitude", "altitude"]);
        let message = err.to_string();
        assert!(message.contains("drone"));
        assert!(message.contains("longitude"));
        assert!(message.contains("altitude"));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let headers = [
            "time_step", "drone_id", "latitude", "longitude", "altitude", "speed", "heading",
        ];
        assert!(SchemaError::check_columns(BatchKind::Drone, &headers).is_ok());
    }
}
