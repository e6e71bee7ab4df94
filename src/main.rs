use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use hostvitals::commands;

fn monitor_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("interval")
            .short('i')
            .long("interval")
            .value_name("MS")
            .help("Refresh tick interval in milliseconds")
            .value_parser(clap::value_parser!(u64).range(1..)),
    )
    .arg(
        Arg::new("deadline")
            .short('d')
            .long("deadline")
            .value_name("MS")
            .help("Upper bound on one collection cycle in milliseconds")
            .value_parser(clap::value_parser!(u64).range(1..)),
    )
    .arg(
        Arg::new("history")
            .long("history")
            .value_name("SAMPLES")
            .help("Number of samples kept per trend series")
            .value_parser(clap::value_parser!(usize)),
    )
    .arg(
        Arg::new("json")
            .long("json")
            .help("Print snapshots as JSON lines instead of running the dashboard")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("once")
            .long("once")
            .help("With --json, print a single snapshot and exit")
            .action(ArgAction::SetTrue)
            .requires("json"),
    )
}

fn main() -> Result<()> {
    let cli = Command::new("hostvitals")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal dashboard that samples host metrics and scores overall system health")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML config file")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (repeatable)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(monitor_args(
            Command::new("monitor").about("Run the live dashboard (default)"),
        ))
        .subcommand(
            Command::new("config").about("Show the effective configuration and its default path"),
        );

    let matches = monitor_args(cli).get_matches();

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        _ => commands::monitor(&matches),
    }
}
