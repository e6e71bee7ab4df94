use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::system_monitor::{
    default_disk_prefixes, CollectorConfig, DEFAULT_ACTIVITY_THRESHOLD, DEFAULT_HISTORY_SIZE,
    DEFAULT_TOP_PROCESSES, MAX_COLLECT_DEADLINE,
};
use crate::error::{Result, VitalsError};

const MAX_TICK_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;
const MAX_COLLECT_EVERY_TICKS: u32 = 1440;
const MAX_CPU_SAMPLE_WINDOW_MS: u64 = 60 * 1000;

/// Runtime configuration, loaded from a TOML file.
///
/// Every field is optional in the file; missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Refresh loop tick period
    pub tick_interval_ms: u64,
    /// A collection cycle starts every N ticks
    pub collect_every_ticks: u32,
    /// Upper bound on one collection cycle
    pub collect_deadline_ms: u64,
    pub cpu_sample_window_ms: u64,
    /// Samples kept per history series
    pub history_capacity: usize,
    pub top_processes: usize,
    pub process_activity_threshold: f64,
    /// Device name prefixes of volumes reported as physical disks
    pub disk_device_prefixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            collect_every_ticks: 2,
            collect_deadline_ms: 5000,
            cpu_sample_window_ms: 500,
            history_capacity: DEFAULT_HISTORY_SIZE,
            top_processes: DEFAULT_TOP_PROCESSES,
            process_activity_threshold: DEFAULT_ACTIVITY_THRESHOLD,
            disk_device_prefixes: default_disk_prefixes(),
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or from the default location.
    ///
    /// A missing file yields the defaults. An explicitly given path must
    /// exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Config::default()),
            },
        };

        if !config_path.exists() {
            if explicit {
                return Err(VitalsError::config(format!(
                    "config file not found: {}",
                    config_path.display()
                )));
            }
            log::debug!("no config at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let data = fs::read_to_string(&config_path)?;
        let config = Self::from_toml(&data)?;
        log::info!("loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(data: &str) -> Result<Self> {
        let config: Config = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// `<config_dir>/hostvitals/config.toml`, when the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hostvitals").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(VitalsError::config("tick_interval_ms must be positive"));
        }
        if self.collect_every_ticks == 0 {
            return Err(VitalsError::config("collect_every_ticks must be positive"));
        }
        if self.collect_deadline_ms == 0 {
            return Err(VitalsError::config("collect_deadline_ms must be positive"));
        }
        if self.cpu_sample_window_ms == 0 {
            return Err(VitalsError::config("cpu_sample_window_ms must be positive"));
        }
        if self.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(VitalsError::config(format!(
                "tick_interval_ms must be at most {}",
                MAX_TICK_INTERVAL_MS
            )));
        }
        if self.collect_every_ticks > MAX_COLLECT_EVERY_TICKS {
            return Err(VitalsError::config(format!(
                "collect_every_ticks must be at most {}",
                MAX_COLLECT_EVERY_TICKS
            )));
        }
        if self.collect_deadline() > MAX_COLLECT_DEADLINE {
            return Err(VitalsError::config(format!(
                "collect_deadline_ms must be at most {}",
                MAX_COLLECT_DEADLINE.as_millis()
            )));
        }
        if self.cpu_sample_window_ms > MAX_CPU_SAMPLE_WINDOW_MS {
            return Err(VitalsError::config(format!(
                "cpu_sample_window_ms must be at most {}",
                MAX_CPU_SAMPLE_WINDOW_MS
            )));
        }
        if self.history_capacity == 0 {
            return Err(VitalsError::InvalidCapacity(0));
        }
        if !self.process_activity_threshold.is_finite() || self.process_activity_threshold < 0.0 {
            return Err(VitalsError::config(
                "process_activity_threshold must be a non-negative number",
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn collect_deadline(&self) -> Duration {
        Duration::from_millis(self.collect_deadline_ms)
    }

    /// Time between two collection cycles
    pub fn collect_period(&self) -> Duration {
        self.tick_interval()
            .saturating_mul(self.collect_every_ticks.max(1))
    }

    pub fn to_collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            cpu_sample_window: Duration::from_millis(self.cpu_sample_window_ms),
            disk_device_prefixes: self.disk_device_prefixes.clone(),
            process_activity_threshold: self.process_activity_threshold,
            top_processes_count: self.top_processes,
        }
    }

    /// Apply command line overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(interval) = overrides.tick_interval_ms {
            self.tick_interval_ms = interval;
        }
        if let Some(deadline) = overrides.collect_deadline_ms {
            self.collect_deadline_ms = deadline;
        }
        if let Some(capacity) = overrides.history_capacity {
            self.history_capacity = capacity;
        }
        self.validate()
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub tick_interval_ms: Option<u64>,
    pub collect_deadline_ms: Option<u64>,
    pub history_capacity: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.collect_deadline(), Duration::from_secs(5));
        assert_eq!(config.history_capacity, 120);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml("top_processes = 10\n").unwrap();
        assert_eq!(config.top_processes, 10);
        assert_eq!(config.collect_every_ticks, 2);
        assert_eq!(config.disk_device_prefixes, default_disk_prefixes());
    }

    #[test]
    fn test_zero_values_rejected() {
        for field in [
            "tick_interval_ms",
            "collect_every_ticks",
            "collect_deadline_ms",
            "cpu_sample_window_ms",
        ] {
            let result = Config::from_toml(&format!("{} = 0\n", field));
            assert!(
                matches!(result, Err(VitalsError::Config(_))),
                "{} = 0 accepted",
                field
            );
        }

        let result = Config::from_toml("history_capacity = 0\n");
        assert!(matches!(result, Err(VitalsError::InvalidCapacity(0))));
    }

    #[test]
    fn test_oversized_values_rejected() {
        let oversized = [
            Config {
                tick_interval_ms: u64::MAX,
                ..Default::default()
            },
            Config {
                collect_deadline_ms: u64::MAX,
                ..Default::default()
            },
            Config {
                collect_deadline_ms: 3_600_001,
                ..Default::default()
            },
            Config {
                cpu_sample_window_ms: 60_001,
                ..Default::default()
            },
            Config {
                collect_every_ticks: 1441,
                ..Default::default()
            },
        ];

        for config in oversized {
            assert!(
                matches!(config.validate(), Err(VitalsError::Config(_))),
                "{:?} accepted",
                config
            );
        }
    }

    #[test]
    fn test_upper_bounds_inclusive() {
        let config = Config {
            tick_interval_ms: 86_400_000,
            collect_every_ticks: 1440,
            collect_deadline_ms: 3_600_000,
            cpu_sample_window_ms: 60_000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.collect_period(),
            Duration::from_millis(86_400_000 * 1440)
        );
    }

    #[test]
    fn test_collect_period_saturates() {
        let config = Config {
            tick_interval_ms: u64::MAX,
            collect_every_ticks: u32::MAX,
            ..Default::default()
        };
        assert_eq!(config.collect_period(), Duration::MAX);
        assert_eq!(Config::default().collect_period(), Duration::from_secs(2));
    }

    #[test]
    fn test_deadline_override_bounded() {
        let mut config = Config::default();
        let result = config.apply_overrides(&ConfigOverrides {
            collect_deadline_ms: Some(u64::MAX),
            ..Default::default()
        });
        assert!(matches!(result, Err(VitalsError::Config(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = Config::from_toml("tick_interval_ms = \"fast\"\n");
        assert!(matches!(result, Err(VitalsError::ConfigParse(_))));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(&ConfigOverrides {
                tick_interval_ms: Some(250),
                collect_deadline_ms: None,
                history_capacity: Some(30),
            })
            .unwrap();

        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.collect_deadline_ms, 5000);
        assert_eq!(config.history_capacity, 30);

        let invalid = config.apply_overrides(&ConfigOverrides {
            history_capacity: Some(0),
            ..Default::default()
        });
        assert!(invalid.is_err());
    }

    #[test]
    fn test_collector_config_mapping() {
        let config = Config {
            cpu_sample_window_ms: 250,
            top_processes: 3,
            ..Default::default()
        };

        let collector = config.to_collector_config();
        assert_eq!(collector.cpu_sample_window, Duration::from_millis(250));
        assert_eq!(collector.top_processes_count, 3);
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
