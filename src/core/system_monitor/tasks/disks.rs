//! Disk monitoring task.

use super::{SubsystemUpdate, TaskContext};
use crate::core::system_monitor::metrics::DiskInfo;
use crate::core::system_monitor::probe::ProbeSet;

/// Task that reports usage of every physical volume.
///
/// Partitions whose device does not match a recognised prefix are skipped
/// before any usage query. A volume whose usage query fails is left out.
pub async fn disks_task<P: ProbeSet>(ctx: TaskContext<P>) {
    let Some(partitions) = ctx.probe("disk partitions", |p| p.partitions()).await else {
        return;
    };

    let mut disks = Vec::new();
    for partition in partitions
        .into_iter()
        .filter(|p| is_physical_device(&p.device, &ctx.config.disk_device_prefixes))
    {
        let mount_point = partition.mount_point.clone();
        let Some(usage) = ctx
            .probe("disk usage", move |p| p.disk_usage(&mount_point))
            .await
        else {
            continue;
        };

        disks.push(DiskInfo {
            device: partition.device,
            mount_point: partition.mount_point,
            fs_type: partition.fs_type,
            total_bytes: usage.total,
            used_bytes: usage.used,
            free_bytes: usage.free,
            used_percent: usage.used_percent,
        });
    }

    ctx.send(SubsystemUpdate::Disks(disks)).await;
}

/// Whether `device` starts with one of the recognised physical-drive prefixes.
pub fn is_physical_device(device: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| device.starts_with(prefix.as_str()))
}
