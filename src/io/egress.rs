//! Sample egress - writes classified datapoints to file
//!
//! Datapoints are written in JSONL format (one JSON object per line)
//! to the file specified in config. Implements `DispatchSink` so it can be
//! wired directly into a session for demos and offline analysis.

use crate::domain::sample::JumpDatapoint;
use crate::domain::types::{Phase, SensorKind};
use crate::io::sink::DispatchSink;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Egress writer for classified samples
pub struct Egress {
    file_path: String,
}

impl Egress {
    pub fn new(file_path: &str) -> Self {
        info!(file_path = %file_path, "egress_initialized");
        Self { file_path: file_path.to_string() }
    }

    /// Write a datapoint to the egress file
    /// Returns true if successful, false otherwise
    pub fn write_datapoint(&self, datapoint: &JumpDatapoint) -> bool {
        let json = datapoint.to_json();

        match self.append_line(&json) {
            Ok(()) => {
                debug!(
                    id = %datapoint.id,
                    jump_id = %datapoint.jump_id,
                    phase = %datapoint.phase,
                    "sample_egressed"
                );
                true
            }
            Err(e) => {
                error!(
                    id = %datapoint.id,
                    error = %e,
                    "sample_egress_failed"
                );
                false
            }
        }
    }

    /// Append a line to the egress file
    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", line)?;
        debug!(file = %self.file_path, bytes = %line.len(), "egress_written");

        Ok(())
    }
}

impl DispatchSink for Egress {
    fn on_sample(&self, sample: &JumpDatapoint) {
        self.write_datapoint(sample);
    }

    fn on_sensor_unavailable(&self, kind: SensorKind) {
        warn!(sensor = %kind, "sensor_unavailable");
    }

    fn on_phase_transition(&self, from: Phase, to: Phase) {
        info!(from = %from, to = %to, "transition_cue");
    }
}
