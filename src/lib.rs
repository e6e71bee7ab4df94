// hostvitals Library - Public API

use std::fs::OpenOptions;
use std::path::Path;

// Re-export error types
pub mod error;
pub use error::{ProbeError, Result, VitalsError};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;

// Initialize logging
//
// Verbosity 0..=3 maps to warn, info, debug and trace. `RUST_LOG` still
// wins when set. With `log_file`, records are appended to that file so the
// TUI screen stays clean.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| VitalsError::other(format!("logger already initialized: {}", e)))
}

/// `<cache_dir>/hostvitals/hostvitals.log`
pub fn default_log_path() -> Option<std::path::PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("hostvitals").join("hostvitals.log"))
}
