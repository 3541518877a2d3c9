//! Dispatch sink - the consumer interface for classified samples
//!
//! The sink is injected at session construction and called synchronously
//! from the tick loop's task, so implementations must return quickly.
//! `ChannelSink` is the provided adapter for consumers that need to do real
//! work: it forwards into a bounded channel without blocking, dropping
//! messages if the consumer falls behind.

use crate::domain::sample::JumpDatapoint;
use crate::domain::types::{Phase, SensorKind};
use tokio::sync::mpsc;

/// Receives each classified sample the engine decides to emit.
///
/// Calls arrive in tick order from a single task. `on_phase_transition` is a
/// fire-and-forget cue (audible/tactile feedback hook), not part of the data
/// contract; it fires exactly once per transition, between the two boundary
/// samples of that transition.
pub trait DispatchSink: Send + Sync {
    fn on_sample(&self, sample: &JumpDatapoint);

    /// A required sensor could not be initialized at session start.
    /// Called at most once per sensor kind; the session never activates.
    fn on_sensor_unavailable(&self, kind: SensorKind);

    /// Transition cue. Default: no-op.
    fn on_phase_transition(&self, _from: Phase, _to: Phase) {}
}

/// Messages forwarded by `ChannelSink`
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Sample(JumpDatapoint),
    SensorUnavailable(SensorKind),
    PhaseTransition { from: Phase, to: Phase },
}

/// Sink adapter that forwards events into a bounded mpsc channel.
///
/// Non-blocking - if the channel is full, events are dropped rather than
/// stalling the tick loop.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<SinkEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SinkEvent>) -> Self {
        Self { tx }
    }
}

impl DispatchSink for ChannelSink {
    fn on_sample(&self, sample: &JumpDatapoint) {
        let _ = self.tx.try_send(SinkEvent::Sample(sample.clone()));
    }

    fn on_sensor_unavailable(&self, kind: SensorKind) {
        let _ = self.tx.try_send(SinkEvent::SensorUnavailable(kind));
    }

    fn on_phase_transition(&self, from: Phase, to: Phase) {
        let _ = self.tx.try_send(SinkEvent::PhaseTransition { from, to });
    }
}

/// Create a new sample channel pair.
///
/// Returns (sink, receiver); the sink can be cloned and shared.
pub fn create_sample_channel(buffer_size: usize) -> (ChannelSink, mpsc::Receiver<SinkEvent>) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (ChannelSink::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::new_uuid_v7;
    use crate::domain::types::{FusedSample, JumpId};

    fn datapoint(phase: Phase) -> JumpDatapoint {
        let fused = FusedSample {
            latitude: 0.0,
            longitude: 0.0,
            pressure_hpa: 1000.0,
            altitude_m: 10.0,
            vertical_speed_mps: 0.0,
            ground_speed_mps: 0.0,
            timestamp_ms: 1,
        };
        JumpDatapoint::from_fused(&JumpId(new_uuid_v7()), &fused, phase)
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_events() {
        let (sink, mut rx) = create_sample_channel(8);

        sink.on_sample(&datapoint(Phase::Walking));
        sink.on_phase_transition(Phase::Walking, Phase::Aircraft);
        sink.on_sensor_unavailable(SensorKind::Pressure);

        assert!(matches!(rx.recv().await.unwrap(), SinkEvent::Sample(_)));
        assert!(matches!(
            rx.recv().await.unwrap(),
            SinkEvent::PhaseTransition { from: Phase::Walking, to: Phase::Aircraft }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            SinkEvent::SensorUnavailable(SensorKind::Pressure)
        ));
    }

    #[tokio::test]
    async fn test_channel_sink_drops_when_full() {
        let (sink, mut rx) = create_sample_channel(1);

        sink.on_sample(&datapoint(Phase::Walking));
        // Channel full: dropped, not blocked
        sink.on_sample(&datapoint(Phase::Aircraft));

        let first = rx.recv().await.unwrap();
        match first {
            SinkEvent::Sample(dp) => assert_eq!(dp.phase, Phase::Walking),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }
}
