//! Phase classification state machine
//!
//! One-directional: Walking -> Aircraft -> Freefall -> Canopy -> Landed.
//! Thresholds are compared strictly so an exact boundary value never
//! advances, and no backward transition exists - a false-early advance is
//! accepted instead of re-entering an earlier phase.
//!
//! An optional time debounce requires an advance condition to hold
//! continuously for a configured duration before the transition fires.

use crate::domain::types::{FusedSample, Phase};
use crate::infra::config::Thresholds;
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of classifying one fused sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No phase change; emit one sample tagged with this phase
    Hold(Phase),
    /// Phase advanced; emit the boundary pair (old-phase-final, new-phase-first)
    Advance { from: Phase, to: Phase },
}

/// The phase state machine. Owns the session's thresholds and the current
/// phase; consumes one fused sample per tick.
pub struct PhaseClassifier {
    phase: Phase,
    thresholds: Thresholds,
    /// None = advance immediately when a condition holds
    debounce: Option<Duration>,
    /// Advance condition seen but not yet held long enough: (target, first seen ms)
    pending: Option<(Phase, u64)>,
}

impl PhaseClassifier {
    pub fn new(thresholds: Thresholds, debounce: Option<Duration>) -> Self {
        Self { phase: Phase::Unknown, thresholds, debounce, pending: None }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Classify one fused sample.
    ///
    /// The first complete sample establishes Walking; this is not a
    /// transition (single emission, no boundary pair) since Unknown is never
    /// a persisted phase.
    pub fn observe(&mut self, sample: &FusedSample) -> Decision {
        if self.phase == Phase::Unknown {
            self.phase = Phase::Walking;
            debug!(ts = %sample.timestamp_ms, "phase_established");
            return Decision::Hold(self.phase);
        }

        // Landed is terminal: no condition is ever evaluated again
        if self.phase.is_terminal() {
            return Decision::Hold(self.phase);
        }

        let Some(target) = self.advance_target(sample) else {
            self.pending = None;
            return Decision::Hold(self.phase);
        };

        if let Some(hold) = self.debounce {
            match self.pending {
                Some((pending_target, first_ms)) if pending_target == target => {
                    let held_ms = sample.timestamp_ms.saturating_sub(first_ms);
                    if held_ms < hold.as_millis() as u64 {
                        return Decision::Hold(self.phase);
                    }
                }
                _ => {
                    self.pending = Some((target, sample.timestamp_ms));
                    return Decision::Hold(self.phase);
                }
            }
        }

        let from = self.phase;
        self.phase = target;
        self.pending = None;
        info!(
            from = %from,
            to = %target,
            ts = %sample.timestamp_ms,
            altitude_m = %sample.altitude_m,
            vertical_speed_mps = %sample.vertical_speed_mps,
            ground_speed_mps = %sample.ground_speed_mps,
            "phase_transition"
        );
        Decision::Advance { from, to: target }
    }

    /// Next phase if this sample satisfies the current phase's advance
    /// condition. Strict inequalities throughout.
    fn advance_target(&self, s: &FusedSample) -> Option<Phase> {
        let t = &self.thresholds;
        match self.phase {
            Phase::Walking => {
                (s.ground_speed_mps > t.aircraft_groundspeed_mps
                    && s.altitude_m > t.aircraft_altitude_m)
                    .then_some(Phase::Aircraft)
            }
            Phase::Aircraft => {
                (s.vertical_speed_mps < -t.freefall_verticalspeed_mps
                    && s.ground_speed_mps < t.freefall_groundspeed_mps)
                    .then_some(Phase::Freefall)
            }
            Phase::Freefall => {
                (s.vertical_speed_mps > -t.canopy_verticalspeed_mps).then_some(Phase::Canopy)
            }
            Phase::Canopy => (s.altitude_m < t.landed_altitude_m).then_some(Phase::Landed),
            // Both handled in observe before conditions are consulted
            Phase::Landed | Phase::Unknown => None,
        }
    }
}
