use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hostvitals::core::system_monitor::{
    CollectorConfig, CpuInfo, DiskUsage, HostInfo, InterfaceCounters, MemoryUsage,
    MetricsCollector, Partition, ProbeSet, ProcessSample,
};
use hostvitals::error::{ProbeError, ProbeResult};

/// Deterministic probe set with switchable failures.
#[derive(Default)]
struct FakeProbes {
    failing: HashSet<&'static str>,
    hanging: HashSet<&'static str>,
    hang_for: Duration,
    // Hanging calls currently blocked, and the most seen at once
    running: Arc<AtomicUsize>,
    peak_running: Arc<AtomicUsize>,
}

impl FakeProbes {
    fn failing(names: &[&'static str]) -> Self {
        Self {
            failing: names.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn hanging(names: &[&'static str]) -> Self {
        Self::hanging_for(names, Duration::from_secs(1))
    }

    fn hanging_for(names: &[&'static str], hang_for: Duration) -> Self {
        Self {
            hanging: names.iter().copied().collect(),
            hang_for,
            ..Default::default()
        }
    }

    fn check(&self, name: &'static str) -> ProbeResult<()> {
        if self.hanging.contains(name) {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_running.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(self.hang_for);
            self.running.fetch_sub(1, Ordering::SeqCst);
        }
        if self.failing.contains(name) {
            return Err(ProbeError::unavailable(format!("{} disabled", name)));
        }
        Ok(())
    }
}

impl ProbeSet for FakeProbes {
    fn host_info(&self) -> ProbeResult<HostInfo> {
        self.check("host")?;
        Ok(HostInfo {
            hostname: "fakehost".into(),
            os: "linux".into(),
            platform: "Test Linux 1.0".into(),
            uptime_secs: 7200,
        })
    }

    fn cpu_info(&self) -> ProbeResult<CpuInfo> {
        self.check("cpu_info")?;
        Ok(CpuInfo {
            model: "Fake CPU".into(),
            cores: 4,
        })
    }

    fn cpu_percent(&self, _window: Duration, per_core: bool) -> ProbeResult<Vec<f64>> {
        self.check("cpu_percent")?;
        if per_core {
            Ok(vec![10.0, 20.0, 30.0, 40.0])
        } else {
            Ok(vec![25.0])
        }
    }

    fn virtual_memory(&self) -> ProbeResult<MemoryUsage> {
        self.check("memory")?;
        Ok(MemoryUsage {
            total: 1000,
            used: 500,
            used_percent: 50.0,
        })
    }

    fn swap_memory(&self) -> ProbeResult<MemoryUsage> {
        self.check("swap")?;
        Ok(MemoryUsage {
            total: 100,
            used: 10,
            used_percent: 10.0,
        })
    }

    fn partitions(&self) -> ProbeResult<Vec<Partition>> {
        self.check("partitions")?;
        Ok(vec![
            partition("/dev/sda1", "/"),
            partition("tmpfs", "/run"),
            partition("/dev/sdb1", "/data"),
            partition("/dev/nvme0n1p1", "/broken"),
        ])
    }

    fn disk_usage(&self, mount_point: &str) -> ProbeResult<DiskUsage> {
        self.check("disk_usage")?;
        match mount_point {
            "/" => Ok(usage(100, 40)),
            "/data" => Ok(usage(100, 90)),
            _ => Err(ProbeError::unavailable("no such volume")),
        }
    }

    fn net_io_counters(&self) -> ProbeResult<Vec<InterfaceCounters>> {
        self.check("network")?;
        Ok(vec![
            iface("eth0", 100, 200),
            iface("lo", 50, 50),
            iface("wlan0", 0, 0),
            iface("eth1", 0, 10),
        ])
    }

    fn processes(&self) -> ProbeResult<Vec<ProcessSample>> {
        self.check("processes")?;
        Ok((1..=8)
            .map(|pid| ProcessSample {
                pid,
                name: Some(format!("proc-{}", pid)),
                cpu_percent: pid as f64,
                memory_percent: 1.0,
            })
            .chain(std::iter::once(ProcessSample {
                pid: 99,
                name: Some("idle".into()),
                cpu_percent: 0.0,
                memory_percent: 0.0,
            }))
            .collect())
    }
}

fn partition(device: &str, mount_point: &str) -> Partition {
    Partition {
        device: device.into(),
        mount_point: mount_point.into(),
        fs_type: "ext4".into(),
    }
}

fn usage(total: u64, used: u64) -> DiskUsage {
    DiskUsage {
        total,
        used,
        free: total - used,
        used_percent: used as f64 * 100.0 / total as f64,
    }
}

fn iface(name: &str, sent: u64, recv: u64) -> InterfaceCounters {
    InterfaceCounters {
        name: name.into(),
        bytes_sent: sent,
        bytes_recv: recv,
        packets_sent: sent / 10,
        packets_recv: recv / 10,
    }
}

fn collector(probes: FakeProbes) -> MetricsCollector<FakeProbes> {
    let config = CollectorConfig {
        cpu_sample_window: Duration::from_millis(10),
        disk_device_prefixes: vec!["/dev/sd".into(), "/dev/nvme".into()],
        ..Default::default()
    };
    MetricsCollector::with_probes(probes, config)
}

#[tokio::test]
async fn test_collect_populates_every_domain() {
    let snapshot = collector(FakeProbes::default())
        .collect(Duration::from_secs(5))
        .await;

    assert_eq!(snapshot.hostname, "fakehost");
    assert_eq!(snapshot.platform, "Test Linux 1.0");
    assert_eq!(snapshot.uptime_secs, 7200);
    assert_eq!(snapshot.cpu_model, "Fake CPU");
    assert_eq!(snapshot.cpu_cores, 4);
    assert_eq!(snapshot.cpu_percent, 25.0);
    assert_eq!(snapshot.cpu_per_core, vec![10.0, 20.0, 30.0, 40.0]);
    assert_eq!(snapshot.mem_total, 1000);
    assert_eq!(snapshot.mem_percent, 50.0);
    assert_eq!(snapshot.swap_used, 10);

    // Health: /data at 90% is the only issue
    assert_eq!(snapshot.health_score, 90);
    assert_eq!(snapshot.health_message, "Disk /dev/sdb1 Low");
}

#[tokio::test]
async fn test_disk_filter_and_failed_usage() {
    let snapshot = collector(FakeProbes::default())
        .collect(Duration::from_secs(5))
        .await;

    let devices: Vec<&str> = snapshot.disks.iter().map(|d| d.device.as_str()).collect();
    assert_eq!(devices, vec!["/dev/sda1", "/dev/sdb1"]);
    assert_eq!(snapshot.disks[0].free_bytes, 60);
}

#[tokio::test]
async fn test_network_filter() {
    let snapshot = collector(FakeProbes::default())
        .collect(Duration::from_secs(5))
        .await;

    let names: Vec<&str> = snapshot
        .networks
        .iter()
        .map(|n| n.interface.as_str())
        .collect();
    assert_eq!(names, vec!["eth0", "eth1"]);
}

#[tokio::test]
async fn test_top_processes_ranked_and_truncated() {
    let snapshot = collector(FakeProbes::default())
        .collect(Duration::from_secs(5))
        .await;

    let pids: Vec<u32> = snapshot.top_processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![8, 7, 6, 5, 4]);
}

#[tokio::test]
async fn test_failing_probe_only_clears_its_fields() {
    let snapshot = collector(FakeProbes::failing(&["memory", "network"]))
        .collect(Duration::from_secs(5))
        .await;

    assert_eq!(snapshot.mem_total, 0);
    assert_eq!(snapshot.mem_percent, 0.0);
    assert!(snapshot.networks.is_empty());

    assert_eq!(snapshot.swap_total, 100);
    assert_eq!(snapshot.hostname, "fakehost");
    assert_eq!(snapshot.cpu_percent, 25.0);
    assert_eq!(snapshot.disks.len(), 2);
}

#[tokio::test]
async fn test_every_probe_failing_still_yields_snapshot() {
    let all = [
        "host",
        "cpu_info",
        "cpu_percent",
        "memory",
        "swap",
        "partitions",
        "disk_usage",
        "network",
        "processes",
    ];
    let snapshot = collector(FakeProbes::failing(&all))
        .collect(Duration::from_secs(5))
        .await;

    assert!(snapshot.hostname.is_empty());
    assert!(snapshot.disks.is_empty());
    assert!(snapshot.top_processes.is_empty());
    assert_eq!(snapshot.health_score, 100);
    assert_eq!(snapshot.health_message, "Excellent");
}

#[tokio::test]
async fn test_hanging_probe_is_cut_off_at_deadline() {
    let deadline = Duration::from_millis(200);
    let started = Instant::now();

    let snapshot = collector(FakeProbes::hanging(&["cpu_percent"]))
        .collect(deadline)
        .await;

    assert!(started.elapsed() < Duration::from_millis(900));
    assert_eq!(snapshot.cpu_percent, 0.0);
    assert!(snapshot.cpu_per_core.is_empty());

    // Domains that answered in time are kept
    assert_eq!(snapshot.hostname, "fakehost");
    assert_eq!(snapshot.cpu_model, "Fake CPU");
    assert_eq!(snapshot.mem_total, 1000);
}

#[tokio::test]
async fn test_stuck_call_not_restarted_by_later_cycles() {
    let probes = FakeProbes::hanging_for(&["partitions"], Duration::from_secs(2));
    let peak = Arc::clone(&probes.peak_running);
    let collector = collector(probes);

    for _ in 0..10 {
        let snapshot = collector.collect(Duration::from_millis(50)).await;
        assert!(snapshot.disks.is_empty());
        assert_eq!(snapshot.hostname, "fakehost");
    }

    // One blocked thread in total, not one per cycle
    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(collector.pending_probes(), 1);
}

#[tokio::test]
async fn test_finished_call_runs_again_next_cycle() {
    let probes = FakeProbes::hanging_for(&["partitions"], Duration::from_millis(100));
    let collector = collector(probes);

    let first = collector.collect(Duration::from_millis(20)).await;
    assert!(first.disks.is_empty());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(collector.pending_probes(), 0);

    let second = collector.collect(Duration::from_secs(5)).await;
    assert_eq!(second.disks.len(), 2);
}

#[tokio::test]
async fn test_unbounded_deadline_does_not_panic() {
    let snapshot = collector(FakeProbes::default())
        .collect(Duration::MAX)
        .await;

    assert_eq!(snapshot.hostname, "fakehost");
    assert_eq!(snapshot.health_score, 90);
}

#[tokio::test]
async fn test_json_output_rejects_oversized_interval() {
    use hostvitals::commands::monitor::run_json_output;
    use hostvitals::core::config::Config;

    let config = Config {
        tick_interval_ms: u64::MAX,
        collect_every_ticks: u32::MAX,
        ..Default::default()
    };

    let result = run_json_output(&config, &collector(FakeProbes::default()), true).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_json_once_prints_single_snapshot() {
    use hostvitals::commands::monitor::run_json_output;
    use hostvitals::core::config::Config;

    let config = Config {
        collect_deadline_ms: 1000,
        ..Default::default()
    };

    let started = Instant::now();
    run_json_output(&config, &collector(FakeProbes::default()), true)
        .await
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));
}
