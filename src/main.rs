//! jumptrack - automatic skydive phase classification engine
//!
//! Reads raw sensor events (NDJSON) from a file or stdin, runs them through
//! a tracking session, and writes the classified sample stream to a JSONL
//! egress file.
//!
//! Module structure:
//! - `domain/` - Core types (JumpDatapoint, Phase, sensor values)
//! - `io/` - External interfaces (sink, feed, egress)
//! - `services/` - Engine logic (session, classifier, altitude, speed)
//! - `infra/` - Infrastructure (config, metrics)

use anyhow::Context;
use clap::Parser;
use jumptrack::infra::Config;
use jumptrack::io::{Egress, SensorEvent};
use jumptrack::services::TrackingSession;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// jumptrack - skydive phase classification engine
#[derive(Parser, Debug)]
#[command(name = "jumptrack", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// NDJSON sensor feed file; reads stdin when omitted
    #[arg(short, long)]
    feed: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for per-tick visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!("jumptrack starting");

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    info!(
        config_file = %config.config_file(),
        tick_interval_ms = %config.tick_interval().as_millis(),
        speed_interval_ms = %config.speed_interval().as_millis(),
        debounce = ?config.debounce(),
        egress_file = %config.egress_file(),
        thresholds = ?config.thresholds(),
        "config_loaded"
    );

    let egress = Arc::new(Egress::new(config.egress_file()));
    let metrics_interval = config.metrics_interval_secs();
    let drain_delay = session_drain_delay(&config);

    let mut session = TrackingSession::new(config, egress);
    let metrics = session.metrics();

    // Periodic metrics reporter
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
        loop {
            interval.tick().await;
            metrics.report().log();
        }
    });

    let Some(handle) = session.start() else {
        anyhow::bail!("session refused to start: required sensor unavailable");
    };
    if let Some(jump_id) = session.jump_id() {
        info!(jump_id = %jump_id, "tracking_started");
    }

    let mut apply = |event: &SensorEvent| match *event {
        SensorEvent::Location { lat, lon, ground_speed_mps, ts } => {
            handle.on_location_update(lat, lon, ground_speed_mps, ts);
        }
        SensorEvent::Pressure { hpa } => handle.on_pressure_update(hpa),
        SensorEvent::Wait { .. } => {}
    };

    let applied = match args.feed {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open feed file {}", path))?;
            jumptrack::io::run_feed(BufReader::new(file), &mut apply).await?
        }
        None => jumptrack::io::run_feed(BufReader::new(tokio::io::stdin()), &mut apply).await?,
    };

    // Feed exhausted: let the final window settle, then tear down
    tokio::time::sleep(drain_delay).await;
    session.stop().await;

    session.metrics().report().log();
    info!(events_applied = %applied, "jumptrack shutdown complete");
    Ok(())
}

/// One extra speed window plus one tick so the last readings influence
/// classification before teardown
fn session_drain_delay(config: &Config) -> std::time::Duration {
    config.speed_interval() + config.tick_interval()
}
