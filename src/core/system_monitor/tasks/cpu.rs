//! CPU monitoring task.

use super::{SubsystemUpdate, TaskContext};
use crate::core::system_monitor::probe::ProbeSet;

/// Task that reports the CPU model and usage.
///
/// Usage is sampled twice over the configured window, once for the
/// aggregate value and once per core. Both samples block for the full
/// window; a shorter sample would not yield a meaningful percentage.
pub async fn cpu_task<P: ProbeSet>(ctx: TaskContext<P>) {
    if let Some(info) = ctx.probe("cpu info", |p| p.cpu_info()).await {
        if !ctx.send(SubsystemUpdate::CpuInfo(info)).await {
            return;
        }
    }

    let window = ctx.config.cpu_sample_window;

    if let Some(values) = ctx
        .probe("cpu percent", move |p| p.cpu_percent(window, false))
        .await
    {
        match values.first() {
            Some(&total) => {
                if !ctx.send(SubsystemUpdate::CpuPercent(total)).await {
                    return;
                }
            }
            None => log::debug!("cpu percent probe returned no value"),
        }
    }

    if let Some(per_core) = ctx
        .probe("per-core cpu percent", move |p| p.cpu_percent(window, true))
        .await
    {
        ctx.send(SubsystemUpdate::CpuPerCore(per_core)).await;
    }
}
