use hostvitals::core::config::Config;
use hostvitals::core::system_monitor::{MetricsSnapshot, NetworkInfo};
use hostvitals::ui::monitor_tui::{Command, MonitorEvent, MonitorState};

fn snapshot(second: i64, cpu: f64, rx: u64) -> MonitorEvent {
    MonitorEvent::MetricsReady(Box::new(MetricsSnapshot {
        collected_at: chrono::DateTime::from_timestamp(second, 0).unwrap(),
        cpu_percent: cpu,
        mem_percent: cpu / 2.0,
        networks: vec![NetworkInfo {
            interface: "eth0".into(),
            bytes_recv: rx,
            bytes_sent: rx / 2,
            ..Default::default()
        }],
        ..Default::default()
    }))
}

#[test]
fn test_refresh_loop_session() {
    let config = Config {
        history_capacity: 3,
        ..Default::default()
    };
    let mut state = MonitorState::new(&config).unwrap();

    // Start-up cycle, then a manual refresh while it runs is ignored
    assert_eq!(state.start(), Command::Collect);
    assert_eq!(
        state.handle_event(MonitorEvent::RefreshRequested),
        Command::None
    );
    assert_eq!(state.handle_event(snapshot(0, 10.0, 0)), Command::None);

    let mut cycles = 1;
    let mut second = 0;
    for _ in 0..10 {
        if state.handle_event(MonitorEvent::Tick) == Command::Collect {
            cycles += 1;
            second += 2;
            state.handle_event(snapshot(second, 10.0 * cycles as f64, 2_000 * second as u64));
        }
    }

    // Ten ticks at the default cadence start five cycles
    assert_eq!(cycles, 6);
    assert_eq!(state.history.cpu_usage.slice(), vec![40.0, 50.0, 60.0]);
    assert_eq!(state.history.network_rx.slice(), vec![2_000.0, 2_000.0, 2_000.0]);
    assert_eq!(state.history.network_tx.latest(), Some(1_000.0));
    assert_eq!(
        state.snapshot.as_ref().map(|s| s.cpu_percent),
        Some(60.0)
    );

    assert_eq!(state.handle_event(MonitorEvent::Quit), Command::Quit);
}
