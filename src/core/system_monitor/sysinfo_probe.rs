//! `ProbeSet` implementation backed by the `sysinfo` crate.

use std::path::Path;
use std::thread;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessesToUpdate,
    RefreshKind, System,
};

use super::probe::{
    percent_of, CpuInfo, DiskUsage, HostInfo, InterfaceCounters, MemoryUsage, Partition,
    ProbeSet, ProcessSample,
};
use crate::error::{ProbeError, ProbeResult};

/// Longest a probe waits for a handle held by a still-running call.
const LOCK_WAIT: Duration = Duration::from_secs(2);

fn acquire<'a, T>(handle: &'a Mutex<T>, domain: &str) -> ProbeResult<MutexGuard<'a, T>> {
    acquire_within(handle, domain, LOCK_WAIT)
}

fn acquire_within<'a, T>(
    handle: &'a Mutex<T>,
    domain: &str,
    wait: Duration,
) -> ProbeResult<MutexGuard<'a, T>> {
    handle
        .try_lock_for(wait)
        .ok_or_else(|| ProbeError::unavailable(format!("{} handle busy", domain)))
}

/// Probes the local host through `sysinfo`.
///
/// Each metric domain owns its own handle so that concurrent probes never
/// wait on each other, in particular while the CPU sampling window sleeps.
pub struct SysinfoProbes {
    cpu: Mutex<System>,
    memory: Mutex<System>,
    processes: Mutex<System>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
}

impl SysinfoProbes {
    pub fn new() -> Self {
        let cpu = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()),
        );
        let memory = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        );

        // Process CPU usage is computed between two refreshes, so take the
        // first one now and let the first cycle report real deltas.
        let mut processes = System::new_with_specifics(
            RefreshKind::nothing()
                .with_memory(MemoryRefreshKind::nothing().with_ram())
                .with_processes(ProcessRefreshKind::nothing().with_cpu().with_memory()),
        );
        processes.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        Self {
            cpu: Mutex::new(cpu),
            memory: Mutex::new(memory),
            processes: Mutex::new(processes),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
        }
    }
}

impl Default for SysinfoProbes {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeSet for SysinfoProbes {
    fn host_info(&self) -> ProbeResult<HostInfo> {
        let hostname =
            System::host_name().ok_or_else(|| ProbeError::unavailable("hostname not reported"))?;
        let name = System::name().unwrap_or_default();
        let version = System::os_version().unwrap_or_default();

        Ok(HostInfo {
            hostname,
            os: std::env::consts::OS.to_string(),
            platform: format!("{} {}", name, version).trim().to_string(),
            uptime_secs: System::uptime(),
        })
    }

    fn cpu_info(&self) -> ProbeResult<CpuInfo> {
        let sys = acquire(&self.cpu, "cpu")?;
        let first = sys
            .cpus()
            .first()
            .ok_or_else(|| ProbeError::unavailable("no CPUs reported"))?;

        Ok(CpuInfo {
            model: first.brand().trim().to_string(),
            cores: sys.cpus().len(),
        })
    }

    fn cpu_percent(&self, window: Duration, per_core: bool) -> ProbeResult<Vec<f64>> {
        let mut sys = acquire(&self.cpu, "cpu")?;
        sys.refresh_cpu_usage();
        thread::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        sys.refresh_cpu_usage();

        if sys.cpus().is_empty() {
            return Err(ProbeError::unavailable("no CPUs reported"));
        }

        let values = if per_core {
            sys.cpus().iter().map(|cpu| cpu.cpu_usage() as f64).collect()
        } else {
            vec![sys.global_cpu_usage() as f64]
        };

        if values.iter().any(|v: &f64| !v.is_finite()) {
            return Err(ProbeError::parse("non-finite CPU usage"));
        }
        Ok(values)
    }

    fn virtual_memory(&self) -> ProbeResult<MemoryUsage> {
        let mut sys = acquire(&self.memory, "memory")?;
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());

        let total = sys.total_memory();
        if total == 0 {
            return Err(ProbeError::unavailable("total memory reported as zero"));
        }
        let used = sys.used_memory();

        Ok(MemoryUsage {
            total,
            used,
            used_percent: percent_of(used, total),
        })
    }

    fn swap_memory(&self) -> ProbeResult<MemoryUsage> {
        let mut sys = acquire(&self.memory, "memory")?;
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_swap());

        let total = sys.total_swap();
        let used = sys.used_swap();

        Ok(MemoryUsage {
            total,
            used,
            used_percent: percent_of(used, total),
        })
    }

    fn partitions(&self) -> ProbeResult<Vec<Partition>> {
        let mut disks = acquire(&self.disks, "disks")?;
        disks.refresh(true);

        Ok(disks
            .list()
            .iter()
            .map(|disk| {
                let mount_point = disk.mount_point().to_string_lossy().to_string();
                Partition {
                    device: device_name(&disk.name().to_string_lossy(), &mount_point),
                    mount_point,
                    fs_type: disk.file_system().to_string_lossy().to_string(),
                }
            })
            .collect())
    }

    fn disk_usage(&self, mount_point: &str) -> ProbeResult<DiskUsage> {
        let disks = acquire(&self.disks, "disks")?;
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new(mount_point))
            .ok_or_else(|| ProbeError::unavailable(format!("{} is not mounted", mount_point)))?;

        let total = disk.total_space();
        let free = disk.available_space();
        let used = total.saturating_sub(free);

        Ok(DiskUsage {
            total,
            used,
            free,
            used_percent: percent_of(used, total),
        })
    }

    fn net_io_counters(&self) -> ProbeResult<Vec<InterfaceCounters>> {
        let mut networks = acquire(&self.networks, "networks")?;
        networks.refresh(true);

        let mut counters: Vec<InterfaceCounters> = networks
            .iter()
            .map(|(name, data)| InterfaceCounters {
                name: name.to_string(),
                bytes_sent: data.total_transmitted(),
                bytes_recv: data.total_received(),
                packets_sent: data.total_packets_transmitted(),
                packets_recv: data.total_packets_received(),
            })
            .collect();
        counters.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(counters)
    }

    fn processes(&self) -> ProbeResult<Vec<ProcessSample>> {
        let mut sys = acquire(&self.processes, "processes")?;
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let total_memory = sys.total_memory();
        let mut samples: Vec<ProcessSample> = sys
            .processes()
            .values()
            .map(|proc| ProcessSample {
                pid: proc.pid().as_u32(),
                name: proc.name().to_str().map(str::to_owned),
                cpu_percent: proc.cpu_usage() as f64,
                memory_percent: percent_of(proc.memory(), total_memory),
            })
            .collect();

        // Discovery order is the process table order, i.e. by pid
        samples.sort_by_key(|s| s.pid);
        Ok(samples)
    }
}

/// Device identifier reported for a partition.
///
/// Windows volumes are identified by their drive letter (`C:`); other
/// platforms use the block device path.
fn device_name(name: &str, mount_point: &str) -> String {
    if cfg!(windows) {
        mount_point.trim_end_matches('\\').to_string()
    } else {
        name.to_string()
    }
}
