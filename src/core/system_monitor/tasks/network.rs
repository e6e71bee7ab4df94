//! Network monitoring task.

use super::{SubsystemUpdate, TaskContext};
use crate::core::system_monitor::metrics::NetworkInfo;
use crate::core::system_monitor::probe::{InterfaceCounters, ProbeSet};

/// Task that reports cumulative counters of the active interfaces.
pub async fn network_task<P: ProbeSet>(ctx: TaskContext<P>) {
    if let Some(counters) = ctx.probe("network counters", |p| p.net_io_counters()).await {
        ctx.send(SubsystemUpdate::Network(filter_interfaces(counters)))
            .await;
    }
}

/// Drop loopback interfaces and interfaces that never moved a byte.
pub fn filter_interfaces(counters: Vec<InterfaceCounters>) -> Vec<NetworkInfo> {
    counters
        .into_iter()
        .filter(|c| !is_loopback(&c.name))
        .filter(|c| c.bytes_sent != 0 || c.bytes_recv != 0)
        .map(|c| NetworkInfo {
            interface: c.name,
            bytes_sent: c.bytes_sent,
            bytes_recv: c.bytes_recv,
            packets_sent: c.packets_sent,
            packets_recv: c.packets_recv,
        })
        .collect()
}

/// Loopback interface names across Linux, macOS and Windows.
pub fn is_loopback(name: &str) -> bool {
    name == "lo" || name == "lo0" || name.starts_with("Loopback")
}
