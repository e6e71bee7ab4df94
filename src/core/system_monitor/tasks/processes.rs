//! Top processes task.

use super::{SubsystemUpdate, TaskContext};
use crate::core::system_monitor::metrics::ProcessInfo;
use crate::core::system_monitor::probe::{ProbeSet, ProcessSample};

/// Task that reports the most CPU-hungry active processes.
pub async fn processes_task<P: ProbeSet>(ctx: TaskContext<P>) {
    let Some(samples) = ctx.probe("processes", |p| p.processes()).await else {
        return;
    };

    let top = rank_processes(
        samples,
        ctx.config.process_activity_threshold,
        ctx.config.top_processes_count,
    );
    ctx.send(SubsystemUpdate::Processes(top)).await;
}

/// Keep active processes, rank them by CPU usage and truncate to `limit`.
///
/// A process is active when its CPU or memory percentage exceeds
/// `threshold`. Samples without a readable name are dropped. The sort is
/// stable, so processes with equal CPU usage keep their discovery order.
pub fn rank_processes(
    samples: Vec<ProcessSample>,
    threshold: f64,
    limit: usize,
) -> Vec<ProcessInfo> {
    let mut active: Vec<ProcessInfo> = samples
        .into_iter()
        .filter(|s| s.cpu_percent > threshold || s.memory_percent > threshold)
        .filter_map(|s| {
            Some(ProcessInfo {
                pid: s.pid,
                name: s.name?,
                cpu_percent: s.cpu_percent,
                memory_percent: s.memory_percent,
            })
        })
        .collect();

    active.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    active.truncate(limit);
    active
}
