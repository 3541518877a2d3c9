//! Classified sample data model ("JumpDatapoint")
//!
//! One datapoint per dispatch: timestamped, geolocated, phase-tagged.
//! Datapoints are immutable once created; a phase transition produces two
//! genuinely distinct values (old-phase-final, new-phase-first), never a
//! mutation of an already-dispatched record.

use crate::domain::types::{FusedSample, JumpId, Phase};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable)
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Get current epoch milliseconds
#[inline]
pub fn epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// A single classified sample of the jump
#[derive(Debug, Clone, Serialize)]
pub struct JumpDatapoint {
    /// Unique datapoint ID (UUIDv7)
    pub id: String,
    /// Enclosing session ID; shared by all datapoints of one jump
    pub jump_id: String,
    /// Decimal degrees
    pub latitude: f64,
    /// Decimal degrees
    pub longitude: f64,
    /// Raw barometric pressure, hPa
    pub pressure: f32,
    /// Meters above the session's ground reference
    pub altitude: f32,
    /// Epoch ms, non-decreasing within a session
    pub timestamp: u64,
    /// m/s, signed; negative = descending
    pub vertical_speed: f32,
    /// m/s, non-negative
    pub ground_speed: f32,
    pub phase: Phase,
}

impl JumpDatapoint {
    /// Create a datapoint from a fused sensor snapshot and a phase tag.
    pub fn from_fused(jump_id: &JumpId, fused: &FusedSample, phase: Phase) -> Self {
        Self {
            id: new_uuid_v7(),
            jump_id: jump_id.0.clone(),
            latitude: fused.latitude,
            longitude: fused.longitude,
            pressure: fused.pressure_hpa,
            altitude: fused.altitude_m,
            timestamp: fused.timestamp_ms,
            vertical_speed: fused.vertical_speed_mps,
            ground_speed: fused.ground_speed_mps as f32,
            phase,
        }
    }

    /// A distinct datapoint with the same measurements but a different phase
    /// tag and a fresh id. Used for the second half of a transition pair.
    pub fn retagged(&self, phase: Phase) -> Self {
        Self { id: new_uuid_v7(), phase, ..self.clone() }
    }

    /// Serialize to a single JSON line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fused() -> FusedSample {
        FusedSample {
            latitude: 52.92,
            longitude: -1.31,
            pressure_hpa: 950.0,
            altitude_m: 540.2,
            vertical_speed_mps: -4.5,
            ground_speed_mps: 38.0,
            timestamp_ms: 1736012345678,
        }
    }

    #[test]
    fn test_from_fused() {
        let jump_id = JumpId(new_uuid_v7());
        let dp = JumpDatapoint::from_fused(&jump_id, &fused(), Phase::Aircraft);

        assert!(!dp.id.is_empty());
        assert_eq!(dp.jump_id, jump_id.0);
        assert_eq!(dp.latitude, 52.92);
        assert_eq!(dp.pressure, 950.0);
        assert_eq!(dp.altitude, 540.2);
        assert_eq!(dp.timestamp, 1736012345678);
        assert_eq!(dp.vertical_speed, -4.5);
        assert_eq!(dp.ground_speed, 38.0);
        assert_eq!(dp.phase, Phase::Aircraft);
    }

    #[test]
    fn test_retagged_is_distinct_value() {
        let jump_id = JumpId(new_uuid_v7());
        let old = JumpDatapoint::from_fused(&jump_id, &fused(), Phase::Aircraft);
        let new = old.retagged(Phase::Freefall);

        assert_ne!(old.id, new.id);
        assert_eq!(old.phase, Phase::Aircraft);
        assert_eq!(new.phase, Phase::Freefall);
        // Measurements and timestamp are shared across the boundary pair
        assert_eq!(old.timestamp, new.timestamp);
        assert_eq!(old.altitude, new.altitude);
        assert_eq!(old.jump_id, new.jump_id);
    }

    #[test]
    fn test_to_json() {
        let jump_id = JumpId(new_uuid_v7());
        let dp = JumpDatapoint::from_fused(&jump_id, &fused(), Phase::Freefall);
        let parsed: serde_json::Value = serde_json::from_str(&dp.to_json()).unwrap();

        assert_eq!(parsed["jump_id"], jump_id.0);
        assert_eq!(parsed["phase"], "freefall");
        assert_eq!(parsed["timestamp"], 1736012345678_u64);
        assert_eq!(parsed["vertical_speed"], -4.5);
    }

    #[test]
    fn test_uuid_v7_generation() {
        let a = new_uuid_v7();
        let b = new_uuid_v7();
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
    }
}
