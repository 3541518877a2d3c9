//! Shared types for the jump tracking engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Newtype wrapper for jump (session) identifiers to provide type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct JumpId(pub String);

impl std::fmt::Display for JumpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discrete classification of a skydive's progress.
///
/// Phases form a total order and only ever advance:
/// Walking < Aircraft < Freefall < Canopy < Landed.
/// `Unknown` is the pre-state before the first complete fused sample and is
/// never emitted once a real phase has been established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Unknown,
    Walking,
    Aircraft,
    Freefall,
    Canopy,
    Landed,
}

impl Phase {
    /// Position in the one-directional phase order. Unknown ranks below
    /// everything since any established phase supersedes it.
    pub fn rank(&self) -> u8 {
        match self {
            Phase::Unknown => 0,
            Phase::Walking => 1,
            Phase::Aircraft => 2,
            Phase::Freefall => 3,
            Phase::Canopy => 4,
            Phase::Landed => 5,
        }
    }

    /// Landed is terminal: every subsequent sample stays Landed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Landed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Unknown => "unknown",
            Phase::Walking => "walking",
            Phase::Aircraft => "aircraft",
            Phase::Freefall => "freefall",
            Phase::Canopy => "canopy",
            Phase::Landed => "landed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known location fix from the satellite provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal speed over ground, m/s, non-negative
    pub ground_speed_mps: f64,
    /// Fix time, epoch ms
    pub timestamp_ms: u64,
}

/// Latest known barometric reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureReading {
    pub hpa: f32,
    /// Time the reading was stored, epoch ms
    pub timestamp_ms: u64,
}

/// One consistent snapshot of derived sensor state, as seen by the
/// classifier on a single tick. All fields are present by construction;
/// a tick with missing inputs never produces a FusedSample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedSample {
    pub latitude: f64,
    pub longitude: f64,
    pub pressure_hpa: f32,
    /// Meters above the session's ground reference
    pub altitude_m: f32,
    /// Signed, negative = descending
    pub vertical_speed_mps: f32,
    pub ground_speed_mps: f64,
    /// Tick time, epoch ms
    pub timestamp_ms: u64,
}

/// Which physical sensor a condition refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Pressure,
    Location,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Pressure => "pressure",
            SensorKind::Location => "location",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensor-level failure taxonomy.
///
/// `InvalidReading` is recoverable (the reading is discarded and the prior
/// buffered value retained); `Unavailable` is fatal to session start.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SensorError {
    #[error("non-physical pressure reading: {hpa} hPa")]
    InvalidReading { hpa: f32 },
    #[error("{0} sensor unavailable")]
    Unavailable(SensorKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_rank_order() {
        let order = [
            Phase::Walking,
            Phase::Aircraft,
            Phase::Freefall,
            Phase::Canopy,
            Phase::Landed,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
        assert!(Phase::Unknown.rank() < Phase::Walking.rank());
    }

    #[test]
    fn test_only_landed_is_terminal() {
        assert!(Phase::Landed.is_terminal());
        assert!(!Phase::Canopy.is_terminal());
        assert!(!Phase::Unknown.is_terminal());
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        let json = serde_json::to_string(&Phase::Freefall).unwrap();
        assert_eq!(json, "\"freefall\"");
    }

    #[test]
    fn test_sensor_error_display() {
        let e = SensorError::InvalidReading { hpa: -5.0 };
        assert!(e.to_string().contains("-5"));
        let e = SensorError::Unavailable(SensorKind::Pressure);
        assert_eq!(e.to_string(), "pressure sensor unavailable");
    }
}
