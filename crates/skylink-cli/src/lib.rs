//! SkyLink CLI - data loading and reporting around the core engine.
//!
//! This crate is the I/O collaborator the core deliberately excludes:
//! CSV batch ingestion for the two input schemas and JSON export of
//! detection results. Binaries:
//! - scan_airspace: pairwise collision scan over two CSV batches
//! - drone_alerts: per-drone ranked alert feed
//! - pilot_threats: tiered threat board for one aircraft

pub mod load;
pub mod report;
