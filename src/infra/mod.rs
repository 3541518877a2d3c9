//! Infrastructure - configuration and metrics
//!
//! This module contains infrastructure concerns:
//! - `config` - Application configuration (TOML loading, per-key defaults)
//! - `metrics` - Lock-free counters with periodic summary logs

pub mod config;
pub mod metrics;

// Re-export commonly used types
pub use config::{Config, Thresholds};
pub use metrics::Metrics;
