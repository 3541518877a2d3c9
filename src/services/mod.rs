//! Services - the classification engine
//!
//! This module contains the core engine components:
//! - `session` - Per-jump orchestration (tick loop, lifecycle, dispatch)
//! - `classifier` - Phase state machine with optional time debounce
//! - `altitude` - Barometric pressure to altitude conversion
//! - `speed` - Vertical speed estimation over a coarse window

pub mod altitude;
pub mod classifier;
pub mod session;
pub mod speed;

// Re-export commonly used types
pub use classifier::{Decision, PhaseClassifier};
pub use session::{SensorAvailability, SessionHandle, SessionState, TrackingSession};
pub use speed::SpeedEstimator;
