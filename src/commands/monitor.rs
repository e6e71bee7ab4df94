//! System monitor command handler.
//!
//! Runs the TUI dashboard, or streams snapshots as JSON for scripting.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;

use super::load_config;
use crate::core::config::Config;
use crate::core::system_monitor::{MetricsCollector, ProbeSet};
use crate::ui::monitor_tui::run_monitor_app;

/// How long exit waits for blocking probe calls that are still running
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let verbosity = matches.get_count("verbose");
    let json_output = matches.get_flag("json");
    let once = matches.get_flag("once");

    // Keep log records off the screen while the TUI owns the terminal
    let log_file = if json_output {
        None
    } else {
        crate::default_log_path()
    };
    if let Err(e) = crate::init_logging(verbosity, log_file.as_deref()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let config = load_config(matches)?;
    log::debug!("effective config: {:?}", config);

    let runtime = build_runtime()?;
    let collector = MetricsCollector::with_config(config.to_collector_config());

    let result = if json_output {
        runtime.block_on(run_json_output(&config, &collector, once))
    } else {
        runtime
            .block_on(run_monitor_app(config, collector))
            .context("Failed to run system monitor")
    };

    // A probe blocked on a stuck filesystem must not hold the process open
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("metrics-worker")
        .build()
        .context("Failed to build async runtime")
}

/// Run in JSON output mode (for scripting)
///
/// Prints one snapshot per collection cycle, one JSON document per line.
pub async fn run_json_output<P: ProbeSet>(
    config: &Config,
    collector: &MetricsCollector<P>,
    once: bool,
) -> Result<()> {
    config.validate()?;
    let mut interval = tokio::time::interval(config.collect_period());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let snapshot = collector.collect(config.collect_deadline()).await;
        println!(
            "{}",
            serde_json::to_string(&snapshot).context("Failed to serialize snapshot")?
        );

        if once {
            return Ok(());
        }
    }
}
