//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `sink` - DispatchSink trait and channel-backed sink adapter
//! - `egress` - Classified sample output to file (JSONL format)
//! - `feed` - NDJSON sensor event ingest for replay and device adapters

pub mod egress;
pub mod feed;
pub mod sink;

// Re-export commonly used types
pub use egress::Egress;
pub use feed::{run_feed, SensorEvent};
pub use sink::{create_sample_channel, ChannelSink, DispatchSink, SinkEvent};
