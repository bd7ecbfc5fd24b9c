//! Unit tests for configuration loading and scan file resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate SSCOPE_CONFIG or SSCOPE_SCAN_FILE are marked with
//! #[serial] to ensure they run sequentially, not in parallel.

use serial_test::serial;
use sscope_common::config::{
    expanded_file_path, load_config, load_toml_config, resolve_scan_file, LoggingConfig,
    ReaderConfig, TomlConfig, CONFIG_ENV_VAR, SCAN_FILE_ENV_VAR,
};
use sscope_common::Error;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = TomlConfig::default();
    assert!(config.scan_file.is_none());
    assert_eq!(config.logging, LoggingConfig::default());
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
    assert_eq!(config.reader.layout, "positional_pair");
    assert_eq!(config.reader.source_details, "container");
}

#[test]
fn test_load_full_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
scan_file = "/cases/42/identified_blocks_expanded.txt"

[logging]
level = "debug"
file = "/var/log/sscope.log"

[reader]
layout = "keyed"
source_details = "per_source"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(
        config.scan_file,
        Some(PathBuf::from("/cases/42/identified_blocks_expanded.txt"))
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/sscope.log")));
    assert_eq!(
        config.reader,
        ReaderConfig {
            layout: "keyed".to_string(),
            source_details: "per_source".to_string(),
        }
    );
}

#[test]
fn test_load_partial_toml_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nfile = \"scan.log\"\n").unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, Some(PathBuf::from("scan.log")));
    assert_eq!(config.reader, ReaderConfig::default());
}

#[test]
fn test_load_malformed_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "scan_file = [unterminated").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_explicit_config_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    assert!(matches!(load_config(Some(&missing)), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_missing_env_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    env::set_var(CONFIG_ENV_VAR, temp_dir.path().join("absent.toml"));

    let config = load_config(None).unwrap();
    assert_eq!(config, TomlConfig::default());

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_config_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("env.toml");
    std::fs::write(&path, "scan_file = \"from-env-config.txt\"\n").unwrap();
    env::set_var(CONFIG_ENV_VAR, &path);

    let config = load_config(None).unwrap();
    assert_eq!(config.scan_file, Some(PathBuf::from("from-env-config.txt")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_cli_scan_file_wins() {
    env::set_var(SCAN_FILE_ENV_VAR, "/tmp/from-env.txt");
    let config = TomlConfig {
        scan_file: Some(PathBuf::from("/tmp/from-toml.txt")),
        ..TomlConfig::default()
    };

    let resolved = resolve_scan_file(
        Some(Path::new("/tmp/from-cli.txt")),
        Some(Path::new("/tmp/be")),
        &config,
    )
    .unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/from-cli.txt"));

    env::remove_var(SCAN_FILE_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_be_dir_before_env() {
    env::set_var(SCAN_FILE_ENV_VAR, "/tmp/from-env.txt");

    let resolved =
        resolve_scan_file(None, Some(Path::new("/tmp/be")), &TomlConfig::default()).unwrap();
    assert_eq!(resolved, expanded_file_path(Path::new("/tmp/be")));
    assert!(resolved.ends_with("identified_blocks_expanded.txt"));

    env::remove_var(SCAN_FILE_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_env_before_toml() {
    env::set_var(SCAN_FILE_ENV_VAR, "/tmp/from-env.txt");
    let config = TomlConfig {
        scan_file: Some(PathBuf::from("/tmp/from-toml.txt")),
        ..TomlConfig::default()
    };

    let resolved = resolve_scan_file(None, None, &config).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/from-env.txt"));

    env::remove_var(SCAN_FILE_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_toml_fallback() {
    env::remove_var(SCAN_FILE_ENV_VAR);
    let config = TomlConfig {
        scan_file: Some(PathBuf::from("/tmp/from-toml.txt")),
        ..TomlConfig::default()
    };

    let resolved = resolve_scan_file(None, None, &config).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/from-toml.txt"));
}

#[test]
#[serial]
fn test_resolve_nothing_configured_is_error() {
    env::remove_var(SCAN_FILE_ENV_VAR);

    let result = resolve_scan_file(None, None, &TomlConfig::default());
    match result {
        Err(Error::Config(msg)) => assert!(msg.contains(SCAN_FILE_ENV_VAR)),
        other => panic!("Expected Config error, got {:?}", other),
    }
}
