//! Domain models - core types of the jump tracking engine
//!
//! This module contains the canonical data types used throughout the system:
//! - `JumpDatapoint` - the primary entity: one classified, geolocated sample
//! - `Phase` - discrete classification of a skydive's progress
//! - `LocationFix` / `PressureReading` - raw sensor values
//! - `FusedSample` - one consistent derived snapshot per tick
//! - `SensorError` - sensor failure taxonomy

pub mod sample;
pub mod types;

// Re-export commonly used types at module level
pub use sample::JumpDatapoint;
pub use types::{FusedSample, JumpId, LocationFix, Phase, PressureReading, SensorError, SensorKind};
