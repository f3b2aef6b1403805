//! SkyLink core: collision detection and alert prioritization between
//! aircraft state vectors and drone telemetry.
//!
//! Pure, synchronous, stateless computation: every operation takes
//! immutable input batches and returns fresh output, so concurrent
//! callers on disjoint batches are safe.
//!
//! Two classification policies are exposed side by side, never merged:
//! the dual-threshold pairwise detector ([`collision`]) and the
//! horizontal-only danger ladder ([`alerts`]).

pub mod alerts;
pub mod collision;
pub mod error;
pub mod models;
pub mod rules;
pub mod spatial;
pub mod tiers;

pub use alerts::{
    aggregate_by_drone, translate_alert, DangerLadder, DangerLevel, DroneAlert, DroneAlertSummary,
};
pub use collision::{
    detect_collisions, detect_collisions_between, summarize, CollisionAlert, CollisionSummary,
    DetectionReport,
};
pub use error::{BatchKind, SchemaError};
pub use models::{
    new_alert_id, AircraftRecord, AircraftState, DataSnapshot, DroneRecord, DroneState,
};
pub use rules::{AltitudeRange, BatchFilter, GeoBounds, SeparationRules};
pub use spatial::{haversine_km, vertical_distance_m};
pub use tiers::{detect_tiered, Threat, ThreatTier};
