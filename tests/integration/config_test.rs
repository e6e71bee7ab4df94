use std::fs;

use hostvitals::core::config::{Config, ConfigOverrides};
use hostvitals::error::VitalsError;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.tick_interval_ms, 1000);
    assert_eq!(config.collect_every_ticks, 2);
    assert_eq!(config.collect_deadline_ms, 5000);
    assert_eq!(config.cpu_sample_window_ms, 500);
    assert_eq!(config.history_capacity, 120);
    assert_eq!(config.top_processes, 5);
}

#[test]
fn test_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
tick_interval_ms = 500
history_capacity = 60
disk_device_prefixes = ["/dev/sd"]
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.tick_interval_ms, 500);
    assert_eq!(config.history_capacity, 60);
    assert_eq!(config.disk_device_prefixes, vec!["/dev/sd".to_string()]);
    assert_eq!(config.collect_deadline_ms, 5000);
}

#[test]
fn test_config_explicit_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let result = Config::load(Some(&path));
    assert!(matches!(result, Err(VitalsError::Config(_))));
}

#[test]
fn test_config_invalid_file_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "collect_deadline_ms = 0\n").unwrap();

    assert!(Config::load(Some(&path)).is_err());

    fs::write(&path, "not toml at all [").unwrap();
    assert!(matches!(
        Config::load(Some(&path)),
        Err(VitalsError::ConfigParse(_))
    ));
}

#[test]
fn test_config_written_toml_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    let mut config = Config::default();
    config
        .apply_overrides(&ConfigOverrides {
            collect_deadline_ms: Some(2500),
            ..Default::default()
        })
        .unwrap();
    fs::write(&path, config.to_toml().unwrap()).unwrap();

    assert_eq!(Config::load(Some(&path)).unwrap(), config);
}

#[test]
fn test_default_path_location() {
    if let Some(path) = Config::default_path() {
        assert!(path.ends_with("hostvitals/config.toml"));
    }
}
