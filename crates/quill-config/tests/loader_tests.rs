//! Config file loading tests

use quill_config::{ConfigError, ConfigLoader, QuillConfig, BASE_URL_ENV};
use serial_test::serial;
use std::io::Write;
use tempfile::TempDir;

#[test]
#[serial]
fn test_load_explicit_file() {
    std::env::remove_var(BASE_URL_ENV);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "api_key = \"k-1\"\nnote_id_key = \"mowenId\"\nauto_publish = false\ntimeout_secs = 5"
    )
    .unwrap();

    let config = ConfigLoader::load(Some(&path)).unwrap();
    assert_eq!(config.api_key.as_deref(), Some("k-1"));
    assert_eq!(config.note_id_key(), "mowenId");
    assert!(!config.auto_publish);
    assert_eq!(config.timeout_secs, 5);
    assert!(config.legacy_key_fallback);
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
#[serial]
fn test_explicit_invalid_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();

    let result = ConfigLoader::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
#[serial]
fn test_env_overrides_base_url() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "base_url = \"https://from-file\"").unwrap();

    std::env::set_var(BASE_URL_ENV, "http://127.0.0.1:9999");
    let config = ConfigLoader::load(Some(&path));
    std::env::remove_var(BASE_URL_ENV);

    assert_eq!(config.unwrap().base_url(), "http://127.0.0.1:9999");
}

#[test]
#[serial]
fn test_save_round_trip() {
    std::env::remove_var(BASE_URL_ENV);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = QuillConfig {
        api_key: Some("secret".to_string()),
        default_tag: "Notes".to_string(),
        ..Default::default()
    };

    ConfigLoader::save(&config, &path).unwrap();
    let loaded = ConfigLoader::load(Some(&path)).unwrap();
    assert_eq!(loaded, config);
}
