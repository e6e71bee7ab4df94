use anyhow::{Context, Result};
use clap::ArgMatches;

use super::load_config;
use crate::core::config::Config;

/// Print the effective configuration as TOML
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;

    match Config::default_path() {
        Some(path) => println!("# Default config path: {}", path.display()),
        None => println!("# No default config directory on this platform"),
    }
    if let Some(path) = matches.get_one::<String>("config") {
        println!("# Loaded from: {}", path);
    }
    println!();

    let text = config
        .to_toml()
        .context("Failed to serialize configuration")?;
    print!("{}", text);
    Ok(())
}
