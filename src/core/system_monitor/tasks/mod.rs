//! Per-domain collection tasks.
//!
//! Each metric domain runs in its own task for the duration of one cycle and
//! reports partial results to the collector as `SubsystemUpdate` messages.

mod cpu;
mod disks;
mod host;
mod memory;
mod network;
mod processes;

pub use cpu::cpu_task;
pub use disks::{disks_task, is_physical_device};
pub use host::host_task;
pub use memory::memory_task;
pub use network::{filter_interfaces, is_loopback, network_task};
pub use processes::{processes_task, rank_processes};

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};

use super::collector::CollectorConfig;
use super::metrics::{DiskInfo, NetworkInfo, ProcessInfo};
use super::probe::{CpuInfo, HostInfo, MemoryUsage, ProbeSet};
use crate::error::{ProbeError, ProbeResult};

/// Updates sent from domain tasks to the collector.
///
/// A task that queries several probes sends one update per probe, so a
/// failing probe only leaves its own fields unset.
#[derive(Debug, Clone)]
pub enum SubsystemUpdate {
    Host(HostInfo),
    CpuInfo(CpuInfo),
    CpuPercent(f64),
    CpuPerCore(Vec<f64>),
    Memory(MemoryUsage),
    Swap(MemoryUsage),
    /// Eligible physical volumes with their usage
    Disks(Vec<DiskInfo>),
    /// Active, non-loopback interfaces
    Network(Vec<NetworkInfo>),
    /// Ranked and truncated top processes
    Processes(Vec<ProcessInfo>),
}

/// Probe calls whose blocking query has not returned yet.
///
/// Shared by every cycle of one collector: a blocking query abandoned at a
/// deadline stays registered until it returns, and the same probe is not
/// started again meanwhile.
#[derive(Debug, Default)]
pub struct InFlight {
    names: Mutex<HashSet<&'static str>>,
}

impl InFlight {
    /// Register `name`, or `None` when a call of it is still running.
    pub fn claim(self: &Arc<Self>, name: &'static str) -> Option<InFlightGuard> {
        if self.names.lock().insert(name) {
            Some(InFlightGuard {
                registry: Arc::clone(self),
                name,
            })
        } else {
            None
        }
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.names.lock().contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.lock().is_empty()
    }
}

/// Releases its probe name when dropped, including on panic.
pub struct InFlightGuard {
    registry: Arc<InFlight>,
    name: &'static str,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.names.lock().remove(self.name);
    }
}

/// Everything a domain task needs for one cycle.
pub struct TaskContext<P> {
    pub probes: Arc<P>,
    pub config: Arc<CollectorConfig>,
    pub deadline: Instant,
    pub update_tx: mpsc::Sender<SubsystemUpdate>,
    pub in_flight: Arc<InFlight>,
}

impl<P> Clone for TaskContext<P> {
    fn clone(&self) -> Self {
        Self {
            probes: Arc::clone(&self.probes),
            config: Arc::clone(&self.config),
            deadline: self.deadline,
            update_tx: self.update_tx.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<P: ProbeSet> TaskContext<P> {
    /// Run one blocking probe query bounded by the cycle deadline.
    ///
    /// Every failure, including the deadline, is logged and reported as
    /// `None`. A probe whose previous call is still blocked is not started
    /// again, so at most one thread per probe is ever parked.
    pub async fn probe<T, F>(&self, name: &'static str, query: F) -> Option<T>
    where
        F: FnOnce(&P) -> ProbeResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let Some(guard) = self.in_flight.claim(name) else {
            log::debug!("{} probe skipped: previous call still running", name);
            return None;
        };

        let probes = Arc::clone(&self.probes);
        let blocking = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            query(&probes)
        });

        let result = match timeout_at(self.deadline, blocking).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ProbeError::unavailable(format!("probe task failed: {}", e))),
            Err(_) => Err(ProbeError::Timeout),
        };

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("{} probe failed: {}", name, e);
                None
            }
        }
    }

    /// Send an update; `false` once the collector stopped listening.
    pub async fn send(&self, update: SubsystemUpdate) -> bool {
        self.update_tx.send(update).await.is_ok()
    }
}
