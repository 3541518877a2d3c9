//! Integration tests for configuration loading

use jumptrack::infra::Config;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[session]
tick_interval_ms = 500
speed_interval_ms = 4000

[thresholds]
aircraft_groundspeed_mps = 18.0
aircraft_altitude_m = 120.0
freefall_verticalspeed_mps = 30.0
freefall_groundspeed_mps = 22.0
canopy_verticalspeed_mps = 8.0
landed_altitude_m = 6.0

[debounce]
enabled = true
hold_ms = 1500

[egress]
file = "out/test-samples.jsonl"

[metrics]
interval_secs = 30
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.tick_interval(), Duration::from_millis(500));
    assert_eq!(config.speed_interval(), Duration::from_millis(4000));
    assert_eq!(config.debounce(), Some(Duration::from_millis(1500)));
    assert_eq!(config.egress_file(), "out/test-samples.jsonl");
    assert_eq!(config.metrics_interval_secs(), 30);

    let t = config.thresholds();
    assert_eq!(t.aircraft_groundspeed_mps, 18.0);
    assert_eq!(t.aircraft_altitude_m, 120.0);
    assert_eq!(t.freefall_verticalspeed_mps, 30.0);
    assert_eq!(t.freefall_groundspeed_mps, 22.0);
    assert_eq!(t.canopy_verticalspeed_mps, 8.0);
    assert_eq!(t.landed_altitude_m, 6.0);
}

#[test]
fn test_partial_config_defaults_remaining_keys() {
    let mut temp_file = NamedTempFile::new().unwrap();

    // Only one section, one key: everything else keeps hardcoded defaults
    let config_content = r#"
[thresholds]
aircraft_altitude_m = 200.0
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.thresholds().aircraft_altitude_m, 200.0);
    assert_eq!(config.thresholds().aircraft_groundspeed_mps, 20.0);
    assert_eq!(config.thresholds().landed_altitude_m, 10.0);
    assert_eq!(config.tick_interval(), Duration::from_secs(1));
    assert!(config.debounce().is_none());
    assert_eq!(config.egress_file(), "samples.jsonl");
}

#[test]
fn test_empty_config_is_all_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"").unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.tick_interval(), Duration::from_secs(1));
    assert_eq!(config.speed_interval(), Duration::from_secs(5));
    assert_eq!(config.thresholds(), jumptrack::infra::Thresholds::default());
}

#[test]
fn test_load_from_path_fallback() {
    // Missing file: warn and fall back to defaults rather than failing start
    let config = Config::load_from_path("does/not/exist.toml");
    assert_eq!(config.tick_interval(), Duration::from_secs(1));
    assert_eq!(config.egress_file(), "samples.jsonl");
}

#[test]
fn test_malformed_config_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[session\ntick_interval_ms = ").unwrap();
    temp_file.flush().unwrap();

    assert!(Config::from_file(temp_file.path()).is_err());
}
