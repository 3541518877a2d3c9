//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! Every key falls back to its hardcoded default independently, so a partial
//! config file (or none at all) still yields a working session.

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Phase transition thresholds, loaded once per session and immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    /// Walking -> Aircraft: ground speed must strictly exceed this (m/s)
    #[serde(default = "default_aircraft_groundspeed")]
    pub aircraft_groundspeed_mps: f64,
    /// Walking -> Aircraft: altitude above ground must strictly exceed this (m)
    #[serde(default = "default_aircraft_altitude")]
    pub aircraft_altitude_m: f32,
    /// Aircraft -> Freefall: descent rate must strictly exceed this (m/s)
    #[serde(default = "default_freefall_verticalspeed")]
    pub freefall_verticalspeed_mps: f32,
    /// Aircraft -> Freefall: ground speed must be strictly below this (m/s)
    #[serde(default = "default_freefall_groundspeed")]
    pub freefall_groundspeed_mps: f64,
    /// Freefall -> Canopy: descent rate recovered above this (m/s)
    #[serde(default = "default_canopy_verticalspeed")]
    pub canopy_verticalspeed_mps: f32,
    /// Canopy -> Landed: altitude above ground strictly below this (m)
    #[serde(default = "default_landed_altitude")]
    pub landed_altitude_m: f32,
}

fn default_aircraft_groundspeed() -> f64 {
    20.0
}

fn default_aircraft_altitude() -> f32 {
    100.0
}

fn default_freefall_verticalspeed() -> f32 {
    35.0
}

fn default_freefall_groundspeed() -> f64 {
    25.0
}

fn default_canopy_verticalspeed() -> f32 {
    10.0
}

fn default_landed_altitude() -> f32 {
    10.0
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            aircraft_groundspeed_mps: default_aircraft_groundspeed(),
            aircraft_altitude_m: default_aircraft_altitude(),
            freefall_verticalspeed_mps: default_freefall_verticalspeed(),
            freefall_groundspeed_mps: default_freefall_groundspeed(),
            canopy_verticalspeed_mps: default_canopy_verticalspeed(),
            landed_altitude_m: default_landed_altitude(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Sampling/dispatch tick interval (ms)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Vertical speed estimation window (ms)
    #[serde(default = "default_speed_interval_ms")]
    pub speed_interval_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_speed_interval_ms() -> u64 {
    5000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            speed_interval_ms: default_speed_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DebounceConfig {
    /// Require advance conditions to persist before transitioning
    #[serde(default)]
    pub enabled: bool,
    /// How long a condition must hold (ms)
    #[serde(default = "default_debounce_hold_ms")]
    pub hold_ms: u64,
}

fn default_debounce_hold_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct EgressConfig {
    /// File path for classified sample egress (JSONL format)
    #[serde(default = "default_egress_file")]
    pub file: String,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self { file: default_egress_file() }
    }
}

fn default_egress_file() -> String {
    "samples.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Interval between metrics summary logs (seconds)
    #[serde(default = "default_metrics_interval_secs")]
    pub interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval_secs() }
    }
}

fn default_metrics_interval_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub thresholds: Option<Thresholds>,
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub egress: EgressConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    tick_interval_ms: u64,
    speed_interval_ms: u64,
    thresholds: Thresholds,
    debounce_enabled: bool,
    debounce_hold_ms: u64,
    egress_file: String,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            speed_interval_ms: default_speed_interval_ms(),
            thresholds: Thresholds::default(),
            debounce_enabled: false,
            debounce_hold_ms: default_debounce_hold_ms(),
            egress_file: default_egress_file(),
            metrics_interval_secs: default_metrics_interval_secs(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self {
            tick_interval_ms: toml_config.session.tick_interval_ms,
            speed_interval_ms: toml_config.session.speed_interval_ms,
            thresholds: toml_config.thresholds.unwrap_or_default(),
            debounce_enabled: toml_config.debounce.enabled,
            debounce_hold_ms: toml_config.debounce.hold_ms,
            egress_file: toml_config.egress.file,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load(args: &[String]) -> Self {
        Self::load_from_path(&Self::resolve_config_path(args))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn speed_interval(&self) -> Duration {
        Duration::from_millis(self.speed_interval_ms)
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Debounce hold duration if enabled, None otherwise
    pub fn debounce(&self) -> Option<Duration> {
        self.debounce_enabled.then(|| Duration::from_millis(self.debounce_hold_ms))
    }

    pub fn egress_file(&self) -> &str {
        &self.egress_file
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to shrink the tick interval
    #[cfg(test)]
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Builder method for tests to shrink the speed window
    #[cfg(test)]
    pub fn with_speed_interval_ms(mut self, ms: u64) -> Self {
        self.speed_interval_ms = ms;
        self
    }

    /// Builder method for tests to enable the time debounce
    #[cfg(test)]
    pub fn with_debounce(mut self, enabled: bool, hold_ms: u64) -> Self {
        self.debounce_enabled = enabled;
        self.debounce_hold_ms = hold_ms;
        self
    }
}
