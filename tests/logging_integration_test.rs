//! Integration tests for logging functionality

use kbackup::config::LoggingConfig;
use kbackup::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_init_logging_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
    };

    let guard = init_logging("info", &config);
    assert!(log_path.exists());
    drop(guard);
}

#[test]
fn test_init_logging_rejects_invalid_level() {
    let config = LoggingConfig {
        local_enabled: false,
        local_path: String::new(),
        local_rotation: "daily".to_string(),
    };

    let err = init_logging("verbose", &config).err();
    assert!(err.is_some());
    assert!(err.unwrap().to_string().contains("Invalid log level"));
}
