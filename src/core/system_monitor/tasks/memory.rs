//! Memory and swap monitoring task.

use super::{SubsystemUpdate, TaskContext};
use crate::core::system_monitor::probe::ProbeSet;

/// Task that reports physical memory and swap usage.
pub async fn memory_task<P: ProbeSet>(ctx: TaskContext<P>) {
    if let Some(memory) = ctx.probe("virtual memory", |p| p.virtual_memory()).await {
        if !ctx.send(SubsystemUpdate::Memory(memory)).await {
            return;
        }
    }

    if let Some(swap) = ctx.probe("swap memory", |p| p.swap_memory()).await {
        ctx.send(SubsystemUpdate::Swap(swap)).await;
    }
}
