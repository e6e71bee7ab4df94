// Command handlers module
pub mod config;
pub mod monitor;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::{Config, ConfigOverrides};

/// Load the config file and apply the overrides present in `matches`.
pub fn load_config(matches: &ArgMatches) -> Result<Config> {
    let path = matches.get_one::<String>("config").map(Path::new);
    let mut config = Config::load(path).context("Failed to load configuration")?;

    let overrides = ConfigOverrides {
        tick_interval_ms: get_arg(matches, "interval"),
        collect_deadline_ms: get_arg(matches, "deadline"),
        history_capacity: get_arg(matches, "history"),
    };
    config
        .apply_overrides(&overrides)
        .context("Invalid command line option")?;

    Ok(config)
}

// Subcommands that do not define an argument report it as absent
fn get_arg<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<T> {
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}

// Re-exports for cleaner imports
pub use monitor::execute as monitor;
