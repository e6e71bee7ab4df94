use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete point-in-time system metrics snapshot.
///
/// Fields whose probe failed keep their zero value; the snapshot is still
/// valid and displayable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub collected_at: DateTime<Utc>,
    pub health_score: u8,
    pub health_message: String,

    // Host
    pub hostname: String,
    pub os: String,
    pub platform: String,
    pub uptime_secs: u64,

    // CPU
    pub cpu_model: String,
    pub cpu_cores: usize,
    pub cpu_percent: f64,
    pub cpu_per_core: Vec<f64>,

    // Memory
    pub mem_total: u64,
    pub mem_used: u64,
    pub mem_percent: f64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_percent: f64,

    pub disks: Vec<DiskInfo>,
    pub networks: Vec<NetworkInfo>,
    pub top_processes: Vec<ProcessInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub interface: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}
