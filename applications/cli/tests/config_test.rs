/// Configuration loading tests
/// Loads TOML files through the same layering the binary uses
use hush_cli::AppConfig;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("hush.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Test values from the file override defaults, everything else stays default
#[test]
fn test_load_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
user = "sam"

[session]
buffering_debounce_ms = 300
max_timer_minutes = 90

[cache]
remote_base_url = "https://storage.example.com/audio"
cache_dir = "/var/cache/hush"

[storage]
data_dir = "/var/lib/hush"
"#,
    );

    let config = AppConfig::load(Some(&path)).unwrap();

    assert_eq!(config.user.as_deref(), Some("sam"));
    assert_eq!(config.session.buffering_debounce_ms, 300);
    assert_eq!(config.session.max_timer_minutes, 90);
    assert_eq!(config.session.timer_tick_ms, 1000);
    assert!(config.session.loop_tracks);
    assert_eq!(config.cache.remote_base_url, "https://storage.example.com/audio");
    assert_eq!(config.cache.cache_dir, PathBuf::from("/var/cache/hush"));
    assert_eq!(config.cache.request_timeout_secs, 300);
    assert_eq!(config.history_path(), PathBuf::from("/var/lib/hush/history.jsonl"));
    assert!(config.validate().is_ok());
}

/// Test a file without a remote base URL loads but does not validate
#[test]
fn test_missing_remote_base_url_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[session]\ndefault_volume = 0.8\n");

    let config = AppConfig::load(Some(&path)).unwrap();

    assert_eq!(config.session.default_volume, 0.8);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("remote base URL"));
}

/// Test an explicit config path must exist
#[test]
fn test_explicit_path_required() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");

    assert!(AppConfig::load(Some(&missing)).is_err());
}

/// Test malformed files are reported as configuration errors
#[test]
fn test_malformed_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[session\nbuffering_debounce_ms = ");

    let err = AppConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
