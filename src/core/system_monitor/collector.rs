use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};

use super::health;
use super::metrics::MetricsSnapshot;
use super::probe::ProbeSet;
use super::sysinfo_probe::SysinfoProbes;
use super::tasks::{
    cpu_task, disks_task, host_task, memory_task, network_task, processes_task, InFlight,
    SubsystemUpdate, TaskContext,
};

/// Default CPU sampling window
pub const DEFAULT_CPU_SAMPLE_WINDOW: Duration = Duration::from_millis(500);
/// Default number of processes kept in a snapshot
pub const DEFAULT_TOP_PROCESSES: usize = 5;
/// Default CPU/memory percentage a process must exceed to be listed
pub const DEFAULT_ACTIVITY_THRESHOLD: f64 = 0.1;
/// Longest deadline a single cycle honours; larger values are clamped
pub const MAX_COLLECT_DEADLINE: Duration = Duration::from_secs(3600);

/// Configuration for metrics collection
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub cpu_sample_window: Duration,
    pub disk_device_prefixes: Vec<String>,
    pub process_activity_threshold: f64,
    pub top_processes_count: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            cpu_sample_window: DEFAULT_CPU_SAMPLE_WINDOW,
            disk_device_prefixes: default_disk_prefixes(),
            process_activity_threshold: DEFAULT_ACTIVITY_THRESHOLD,
            top_processes_count: DEFAULT_TOP_PROCESSES,
        }
    }
}

/// Device prefixes of physical drives on the current platform.
pub fn default_disk_prefixes() -> Vec<String> {
    let prefixes: &[&str] = if cfg!(windows) {
        &["C:", "D:", "E:", "F:"]
    } else {
        &[
            "/dev/sd",
            "/dev/nvme",
            "/dev/vd",
            "/dev/hd",
            "/dev/xvd",
            "/dev/mmcblk",
            "/dev/disk",
        ]
    };
    prefixes.iter().map(|p| p.to_string()).collect()
}

/// Collects one metrics snapshot per call by fanning out one task per
/// metric domain.
pub struct MetricsCollector<P = SysinfoProbes> {
    probes: Arc<P>,
    config: Arc<CollectorConfig>,
    in_flight: Arc<InFlight>,
}

impl MetricsCollector<SysinfoProbes> {
    /// Create a new MetricsCollector over the local host with default configuration
    pub fn new() -> Self {
        Self::with_config(CollectorConfig::default())
    }

    /// Create a new MetricsCollector over the local host with custom configuration
    pub fn with_config(config: CollectorConfig) -> Self {
        Self::with_probes(SysinfoProbes::new(), config)
    }
}

impl Default for MetricsCollector<SysinfoProbes> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ProbeSet> MetricsCollector<P> {
    pub fn with_probes(probes: P, config: CollectorConfig) -> Self {
        Self {
            probes: Arc::new(probes),
            config: Arc::new(config),
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// Number of blocking probe calls abandoned by earlier cycles that
    /// have not returned yet.
    pub fn pending_probes(&self) -> usize {
        self.in_flight.len()
    }

    /// Run one collection cycle bounded by `deadline`.
    ///
    /// Always returns a complete snapshot. Probes that fail or are still
    /// running when the deadline passes leave their fields at zero value.
    /// A probe still blocked from an earlier cycle is skipped rather than
    /// started a second time.
    pub async fn collect(&self, deadline: Duration) -> MetricsSnapshot {
        let deadline = Instant::now() + deadline.min(MAX_COLLECT_DEADLINE);
        let mut snapshot = MetricsSnapshot {
            collected_at: chrono::Utc::now(),
            ..Default::default()
        };

        let (update_tx, mut update_rx) = mpsc::channel::<SubsystemUpdate>(32);
        let ctx = TaskContext {
            probes: Arc::clone(&self.probes),
            config: Arc::clone(&self.config),
            deadline,
            update_tx,
            in_flight: Arc::clone(&self.in_flight),
        };

        let mut tasks = JoinSet::new();
        tasks.spawn(host_task(ctx.clone()));
        tasks.spawn(cpu_task(ctx.clone()));
        tasks.spawn(memory_task(ctx.clone()));
        tasks.spawn(disks_task(ctx.clone()));
        tasks.spawn(network_task(ctx.clone()));
        tasks.spawn(processes_task(ctx));

        // The channel closes once every task has finished and dropped its
        // sender, which is the join point of the cycle.
        loop {
            match timeout_at(deadline, update_rx.recv()).await {
                Ok(Some(update)) => apply_update(&mut snapshot, update),
                Ok(None) => break,
                Err(_) => {
                    log::warn!("collection deadline exceeded, abandoning unfinished probes");
                    break;
                }
            }
        }
        tasks.abort_all();

        let report = health::score(&snapshot);
        snapshot.health_score = report.score;
        snapshot.health_message = report.message;

        log::debug!(
            "collected snapshot: health {} ({})",
            snapshot.health_score,
            snapshot.health_message
        );
        snapshot
    }
}

/// Merge one partial result into the snapshot under construction.
pub fn apply_update(snapshot: &mut MetricsSnapshot, update: SubsystemUpdate) {
    match update {
        SubsystemUpdate::Host(host) => {
            snapshot.hostname = host.hostname;
            snapshot.os = host.os;
            snapshot.platform = host.platform;
            snapshot.uptime_secs = host.uptime_secs;
        }
        SubsystemUpdate::CpuInfo(info) => {
            snapshot.cpu_model = info.model;
            snapshot.cpu_cores = info.cores;
        }
        SubsystemUpdate::CpuPercent(percent) => snapshot.cpu_percent = percent,
        SubsystemUpdate::CpuPerCore(per_core) => snapshot.cpu_per_core = per_core,
        SubsystemUpdate::Memory(memory) => {
            snapshot.mem_total = memory.total;
            snapshot.mem_used = memory.used;
            snapshot.mem_percent = memory.used_percent;
        }
        SubsystemUpdate::Swap(swap) => {
            snapshot.swap_total = swap.total;
            snapshot.swap_used = swap.used;
            snapshot.swap_percent = swap.used_percent;
        }
        SubsystemUpdate::Disks(disks) => snapshot.disks = disks,
        SubsystemUpdate::Network(networks) => snapshot.networks = networks,
        SubsystemUpdate::Processes(processes) => snapshot.top_processes = processes,
    }
}
