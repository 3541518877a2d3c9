//! Barometric pressure to altitude conversion
//!
//! Pure hypsometric conversion against the ICAO standard atmosphere.
//! The session's ground reference is the converted value of the first valid
//! pressure reading; emitted altitudes are relative to that reference so
//! thresholds stay meaningful across airfield elevations.

use crate::domain::types::SensorError;

/// ICAO standard sea-level pressure, hPa
pub const STANDARD_PRESSURE_HPA: f32 = 1013.25;

const HYPSOMETRIC_SCALE_M: f32 = 44330.0;
const HYPSOMETRIC_EXPONENT: f32 = 1.0 / 5.255;

/// Convert a barometric pressure (hPa) to altitude in meters above the
/// standard-atmosphere zero point.
///
/// Non-positive or non-finite readings are non-physical and rejected as
/// `SensorError::InvalidReading`.
#[inline]
pub fn pressure_to_altitude(hpa: f32) -> Result<f32, SensorError> {
    if !hpa.is_finite() || hpa <= 0.0 {
        return Err(SensorError::InvalidReading { hpa });
    }
    Ok(HYPSOMETRIC_SCALE_M * (1.0 - (hpa / STANDARD_PRESSURE_HPA).powf(HYPSOMETRIC_EXPONENT)))
}

/// Altitude above a ground reference, both in meters
#[inline]
pub fn relative_altitude(absolute_m: f32, ground_reference_m: f32) -> f32 {
    absolute_m - ground_reference_m
}
