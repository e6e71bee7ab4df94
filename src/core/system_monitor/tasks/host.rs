//! Host identity task.

use super::{SubsystemUpdate, TaskContext};
use crate::core::system_monitor::probe::ProbeSet;

/// Task that reports hostname, OS, platform and uptime.
pub async fn host_task<P: ProbeSet>(ctx: TaskContext<P>) {
    if let Some(info) = ctx.probe("host info", |p| p.host_info()).await {
        ctx.send(SubsystemUpdate::Host(info)).await;
    }
}
