//! Vertical speed estimation from buffered altitude samples
//!
//! A backward finite difference over a coarse fixed window (default 5 s).
//! The window is deliberately wide: it smooths single-reading pressure noise
//! instead of amplifying it into spurious per-sample derivatives.

use std::time::Duration;

/// Estimates vertical speed from consecutive altitude samples.
///
/// Holds exactly one buffered prior (altitude, time). `update` recomputes
/// the speed only when the configured interval has elapsed since the buffered
/// prior; calls in between return the last computed value unchanged.
#[derive(Debug)]
pub struct SpeedEstimator {
    interval: Duration,
    prior: Option<(f32, u64)>,
    last_speed_mps: f32,
}

impl SpeedEstimator {
    pub fn new(interval: Duration) -> Self {
        Self { interval, prior: None, last_speed_mps: 0.0 }
    }

    /// Feed the current altitude (meters) at `now_ms` and get the current
    /// vertical speed estimate (m/s, negative = descending).
    ///
    /// The first call buffers and returns 0.0 by convention - an undefined
    /// speed is not a failure.
    pub fn update(&mut self, altitude_m: f32, now_ms: u64) -> f32 {
        let Some((prior_alt, prior_ms)) = self.prior else {
            self.prior = Some((altitude_m, now_ms));
            return self.last_speed_mps;
        };

        let elapsed_ms = now_ms.saturating_sub(prior_ms);
        if elapsed_ms < self.interval.as_millis() as u64 {
            return self.last_speed_mps;
        }

        let elapsed_secs = elapsed_ms as f32 / 1000.0;
        self.last_speed_mps = (altitude_m - prior_alt) / elapsed_secs;
        self.prior = Some((altitude_m, now_ms));
        self.last_speed_mps
    }
}
