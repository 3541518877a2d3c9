//! Sensor event feed - NDJSON ingest for replay and live adapters
//!
//! One JSON object per line:
//!
//! ```text
//! {"type":"location","lat":52.92,"lon":-1.31,"ground_speed_mps":2.0,"ts":1736012345678}
//! {"type":"pressure","hpa":1013.25}
//! {"type":"wait","ms":1000}
//! ```
//!
//! `wait` records pace a replay; a live device adapter simply never emits
//! them. Malformed lines are logged and skipped so a corrupt record cannot
//! kill the feed.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// A single raw sensor event on the feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SensorEvent {
    Location {
        lat: f64,
        lon: f64,
        ground_speed_mps: f64,
        ts: u64,
    },
    Pressure {
        hpa: f32,
    },
    /// Replay pacing; consumed by the feed runner, never forwarded
    Wait {
        ms: u64,
    },
}

/// Parse one feed line
pub fn parse_line(line: &str) -> Option<SensorEvent> {
    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(error = %e, line = %line, "feed_line_rejected");
            None
        }
    }
}

/// Drain a feed, applying each location/pressure event via `apply` and
/// honoring `wait` pacing. Returns the number of events applied.
pub async fn run_feed<R, F>(reader: R, mut apply: F) -> anyhow::Result<u64>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&SensorEvent),
{
    let mut lines = reader.lines();
    let mut applied = 0u64;

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(event) = parse_line(trimmed) else {
            continue;
        };
        match event {
            SensorEvent::Wait { ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
            }
            ref e => {
                apply(e);
                applied += 1;
            }
        }
    }

    debug!(applied = %applied, "feed_drained");
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        let event = parse_line(
            r#"{"type":"location","lat":52.92,"lon":-1.31,"ground_speed_mps":2.0,"ts":1000}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            SensorEvent::Location { lat: 52.92, lon: -1.31, ground_speed_mps: 2.0, ts: 1000 }
        );
    }

    #[test]
    fn test_parse_pressure() {
        let event = parse_line(r#"{"type":"pressure","hpa":1013.25}"#).unwrap();
        assert_eq!(event, SensorEvent::Pressure { hpa: 1013.25 });
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        assert!(parse_line("not json").is_none());
        assert!(parse_line(r#"{"type":"teleport"}"#).is_none());
    }

    #[test]
    fn test_round_trip() {
        let event = SensorEvent::Wait { ms: 500 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(parse_line(&json).unwrap(), event);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_feed_applies_events_in_order() {
        let input = concat!(
            r#"{"type":"pressure","hpa":1013.25}"#,
            "\n",
            r#"{"type":"wait","ms":1000}"#,
            "\n",
            "garbage line\n",
            "\n",
            r#"{"type":"location","lat":1.0,"lon":2.0,"ground_speed_mps":3.0,"ts":42}"#,
            "\n",
        );
        let mut seen = Vec::new();
        let applied = run_feed(input.as_bytes(), |e| seen.push(*e)).await.unwrap();

        assert_eq!(applied, 2);
        assert!(matches!(seen[0], SensorEvent::Pressure { .. }));
        assert!(matches!(seen[1], SensorEvent::Location { ts: 42, .. }));
    }
}
