//! Tracking session - per-jump orchestration
//!
//! A session owns the jump identifier, the shared sensor snapshot, the
//! periodic tick loop, and the threshold configuration for its lifetime.
//! Sensor producers push most-recent-wins updates through a `SessionHandle`
//! and never block; the tick loop reads one consistent snapshot per tick,
//! derives altitude and vertical speed, classifies, and dispatches to the
//! injected sink in tick order.
//!
//! Lifecycle: Idle -> Active -> Idle. A session is not resumable; every
//! start generates a fresh jump id and discards prior buffers. There is no
//! paused state - losing one sensor only suppresses emission for the ticks
//! it is missing.

use crate::domain::sample::{epoch_ms, new_uuid_v7, JumpDatapoint};
use crate::domain::types::{
    FusedSample, JumpId, LocationFix, PressureReading, SensorError, SensorKind,
};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::io::sink::DispatchSink;
use crate::services::altitude::{pressure_to_altitude, relative_altitude};
use crate::services::classifier::{Decision, PhaseClassifier};
use crate::services::speed::SpeedEstimator;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// Result of the platform's sensor probe, supplied by the caller at
/// construction (the minimal bind contract).
#[derive(Debug, Clone, Copy)]
pub struct SensorAvailability {
    pub pressure: bool,
    pub location: bool,
}

impl Default for SensorAvailability {
    fn default() -> Self {
        Self { pressure: true, location: true }
    }
}

/// Shared mutable sensor state. Producers overwrite, the tick loop reads a
/// snapshot; nobody waits on anybody.
#[derive(Debug)]
struct SensorState {
    /// False after stop(): late callbacks are dropped silently
    accepting: bool,
    location: Option<LocationFix>,
    pressure: Option<PressureReading>,
    /// Converted altitude of the first valid pressure reading; fixed once
    ground_reference_m: Option<f32>,
}

impl SensorState {
    fn fresh() -> Self {
        Self { accepting: true, location: None, pressure: None, ground_reference_m: None }
    }
}

/// Cloneable inbound surface for sensor producers and external queries
#[derive(Clone)]
pub struct SessionHandle {
    shared: Arc<Mutex<SensorState>>,
    metrics: Arc<Metrics>,
}

impl SessionHandle {
    /// Store the latest location fix (most-recent-wins, never blocks)
    pub fn on_location_update(&self, lat: f64, lon: f64, ground_speed_mps: f64, timestamp_ms: u64) {
        let mut state = self.shared.lock();
        if !state.accepting {
            debug!("location_update_dropped");
            return;
        }
        state.location =
            Some(LocationFix { latitude: lat, longitude: lon, ground_speed_mps, timestamp_ms });
    }

    /// Store the latest pressure reading. A non-physical value is rejected
    /// here and the prior buffered value stays in place (stale until
    /// replaced). The first valid reading fixes the ground reference.
    pub fn on_pressure_update(&self, hpa: f32) {
        let absolute_m = match pressure_to_altitude(hpa) {
            Ok(m) => m,
            Err(e) => {
                self.metrics.record_invalid_reading();
                warn!(error = %e, "pressure_update_rejected");
                return;
            }
        };

        let mut state = self.shared.lock();
        if !state.accepting {
            debug!("pressure_update_dropped");
            return;
        }
        if state.ground_reference_m.is_none() {
            state.ground_reference_m = Some(absolute_m);
            info!(ground_reference_m = %absolute_m, "ground_reference_fixed");
        }
        state.pressure = Some(PressureReading { hpa, timestamp_ms: epoch_ms() });
    }

    /// Converted altitude of the session's first pressure sample, the zero
    /// point of all emitted altitudes. None before the first valid reading.
    pub fn ground_reference_altitude(&self) -> Option<f32> {
        self.shared.lock().ground_reference_m
    }
}

/// Per-jump orchestrator. Construct once per potential session owner;
/// `start`/`stop` may be called repeatedly.
pub struct TrackingSession {
    config: Config,
    sink: Arc<dyn DispatchSink>,
    availability: SensorAvailability,
    metrics: Arc<Metrics>,
    shared: Arc<Mutex<SensorState>>,
    jump_id: Option<JumpId>,
    shutdown_tx: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl TrackingSession {
    pub fn new(config: Config, sink: Arc<dyn DispatchSink>) -> Self {
        Self {
            config,
            sink,
            availability: SensorAvailability::default(),
            metrics: Arc::new(Metrics::new()),
            shared: Arc::new(Mutex::new(SensorState::fresh())),
            jump_id: None,
            shutdown_tx: None,
            task: None,
        }
    }

    /// Override the default all-available sensor probe result
    pub fn with_availability(mut self, availability: SensorAvailability) -> Self {
        self.availability = availability;
        self
    }

    pub fn state(&self) -> SessionState {
        if self.task.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    /// Jump id of the current (or most recent) session
    pub fn jump_id(&self) -> Option<&JumpId> {
        self.jump_id.as_ref()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// Begin a session.
    ///
    /// Returns None without activating if a required sensor is unavailable;
    /// each missing sensor is reported once via the sink, never as a panic
    /// or error value. On an already-active session this is a no-op that
    /// returns the existing handle.
    pub fn start(&mut self) -> Option<SessionHandle> {
        if self.task.is_some() {
            debug!("start_ignored_already_active");
            return Some(self.handle());
        }

        let mut all_available = true;
        if !self.availability.pressure {
            warn!(error = %SensorError::Unavailable(SensorKind::Pressure), "session_start_refused");
            self.sink.on_sensor_unavailable(SensorKind::Pressure);
            all_available = false;
        }
        if !self.availability.location {
            warn!(error = %SensorError::Unavailable(SensorKind::Location), "session_start_refused");
            self.sink.on_sensor_unavailable(SensorKind::Location);
            all_available = false;
        }
        if !all_available {
            return None;
        }

        let jump_id = JumpId(new_uuid_v7());
        *self.shared.lock() = SensorState::fresh();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let ticker = TickLoop {
            jump_id: jump_id.clone(),
            config: self.config.clone(),
            shared: self.shared.clone(),
            sink: self.sink.clone(),
            metrics: self.metrics.clone(),
        };
        self.task = Some(tokio::spawn(ticker.run(shutdown_rx)));
        self.shutdown_tx = Some(shutdown_tx);

        info!(
            jump_id = %jump_id,
            tick_interval_ms = %self.config.tick_interval().as_millis(),
            debounce = ?self.config.debounce(),
            "session_started"
        );
        self.jump_id = Some(jump_id);
        Some(self.handle())
    }

    /// Stop the session. Idempotent; safe on an already-stopped session.
    ///
    /// When this returns the tick task has been torn down, no further sink
    /// calls will occur, and late sensor callbacks are dropped.
    pub async fn stop(&mut self) {
        self.shared.lock().accepting = false;

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
            info!(jump_id = ?self.jump_id, "session_stopped");
        }
    }

    fn handle(&self) -> SessionHandle {
        SessionHandle { shared: self.shared.clone(), metrics: self.metrics.clone() }
    }
}

/// The per-session background task: sample, fuse, classify, dispatch.
struct TickLoop {
    jump_id: JumpId,
    config: Config,
    shared: Arc<Mutex<SensorState>>,
    sink: Arc<dyn DispatchSink>,
    metrics: Arc<Metrics>,
}

impl TickLoop {
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut tick_interval = interval(self.config.tick_interval());
        let mut estimator = SpeedEstimator::new(self.config.speed_interval());
        let mut classifier = PhaseClassifier::new(self.config.thresholds(), self.config.debounce());

        // Wall-clock anchor paired with the runtime clock so timestamps stay
        // monotonic within the session (and deterministic under test time)
        let epoch_anchor = epoch_ms();
        let started = tokio::time::Instant::now();

        loop {
            tokio::select! {
                _ = tick_interval.tick() => {
                    let now_ms = epoch_anchor + started.elapsed().as_millis() as u64;
                    self.tick(now_ms, &mut estimator, &mut classifier);
                }
                _ = shutdown.changed() => break,
            }
        }
    }

    fn tick(&self, now_ms: u64, estimator: &mut SpeedEstimator, classifier: &mut PhaseClassifier) {
        self.metrics.record_tick();

        let (location, pressure, ground_reference) = {
            let state = self.shared.lock();
            (state.location, state.pressure, state.ground_reference_m)
        };

        let (Some(location), Some(pressure), Some(ground_reference)) =
            (location, pressure, ground_reference)
        else {
            // Not enough data: emit nothing, wait for the next tick
            self.metrics.record_incomplete_tick();
            debug!("tick_incomplete");
            return;
        };

        // Validated at ingest; a failure here still only costs this tick
        let Ok(absolute_m) = pressure_to_altitude(pressure.hpa) else {
            self.metrics.record_incomplete_tick();
            return;
        };
        let altitude_m = relative_altitude(absolute_m, ground_reference);
        let vertical_speed_mps = estimator.update(altitude_m, now_ms);

        let fused = FusedSample {
            latitude: location.latitude,
            longitude: location.longitude,
            pressure_hpa: pressure.hpa,
            altitude_m,
            vertical_speed_mps,
            ground_speed_mps: location.ground_speed_mps,
            timestamp_ms: now_ms,
        };

        match classifier.observe(&fused) {
            Decision::Hold(phase) => {
                let datapoint = JumpDatapoint::from_fused(&self.jump_id, &fused, phase);
                self.sink.on_sample(&datapoint);
                self.metrics.record_samples_emitted(1);
            }
            Decision::Advance { from, to } => {
                // Two distinct immutable values with equal timestamps: the
                // final sample of the outgoing phase and the first of the
                // incoming one, so rendered tracks get a sharp boundary
                let outgoing = JumpDatapoint::from_fused(&self.jump_id, &fused, from);
                let incoming = outgoing.retagged(to);
                self.sink.on_sample(&outgoing);
                self.sink.on_phase_transition(from, to);
                self.sink.on_sample(&incoming);
                self.metrics.record_samples_emitted(2);
                self.metrics.record_transition();
            }
        }
    }
}
