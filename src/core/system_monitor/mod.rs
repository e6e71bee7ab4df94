//! System monitoring core functionality.
//!
//! This module provides the business logic for collecting, scoring and
//! recording host metrics: CPU, memory, swap, disks, network and top
//! processes.

mod collector;
pub mod enrich;
pub mod health;
mod history;
mod metrics;
pub mod probe;
mod sysinfo_probe;
pub mod tasks;

pub use collector::{
    apply_update, default_disk_prefixes, CollectorConfig, MetricsCollector,
    DEFAULT_ACTIVITY_THRESHOLD, DEFAULT_CPU_SAMPLE_WINDOW, DEFAULT_TOP_PROCESSES, MAX_COLLECT_DEADLINE,
};
pub use enrich::{enrich, BatteryStatus, Enrichment};
pub use health::{score, HealthIssue, HealthReport, HealthStatus, IssueCategory, IssueSeverity};
pub use history::{MetricsHistory, RingBuffer, DEFAULT_HISTORY_SIZE};
pub use metrics::{DiskInfo, MetricsSnapshot, NetworkInfo, ProcessInfo};
pub use probe::{
    CpuInfo, DiskUsage, HostInfo, InterfaceCounters, MemoryUsage, Partition, ProbeSet,
    ProcessSample,
};
pub use sysinfo_probe::SysinfoProbes;
pub use tasks::{InFlight, SubsystemUpdate};
