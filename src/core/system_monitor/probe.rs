//! Probe interface consumed by the collector.
//!
//! Each method is an independent, blocking OS query. Implementations may
//! fail at any time (platform or permission variance); the collector treats
//! every error the same way and never assumes a probe is available.

use std::time::Duration;

use crate::error::ProbeResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub hostname: String,
    pub os: String,
    pub platform: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuInfo {
    pub model: String,
    pub cores: usize,
}

/// Usage of either physical memory or swap, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

/// Cumulative counters of one network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

/// One enumerated process. `name` is `None` when it could not be read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: Option<String>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// Source of raw host metrics, one method per metric domain.
pub trait ProbeSet: Send + Sync + 'static {
    fn host_info(&self) -> ProbeResult<HostInfo>;

    fn cpu_info(&self) -> ProbeResult<CpuInfo>;

    /// CPU usage measured over `window`.
    ///
    /// Returns a single aggregate value, or one value per logical core when
    /// `per_core` is set. Blocks for the whole window.
    fn cpu_percent(&self, window: Duration, per_core: bool) -> ProbeResult<Vec<f64>>;

    fn virtual_memory(&self) -> ProbeResult<MemoryUsage>;

    fn swap_memory(&self) -> ProbeResult<MemoryUsage>;

    fn partitions(&self) -> ProbeResult<Vec<Partition>>;

    fn disk_usage(&self, mount_point: &str) -> ProbeResult<DiskUsage>;

    fn net_io_counters(&self) -> ProbeResult<Vec<InterfaceCounters>>;

    /// All processes in discovery order.
    fn processes(&self) -> ProbeResult<Vec<ProcessSample>>;
}

/// Percentage of `used` over `total`, zero when `total` is zero.
pub(crate) fn percent_of(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
