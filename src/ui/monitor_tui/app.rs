use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{mpsc, watch};

use crate::core::config::Config;
use crate::core::system_monitor::{
    enrich, Enrichment, MetricsCollector, MetricsHistory, MetricsSnapshot, ProbeSet,
};

use super::event_handler::{map_key, MonitorEvent};
use super::render::render_ui;

/// Side effect requested by a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    /// Start a collection cycle
    Collect,
    Quit,
}

/// Monitor application state.
///
/// Transitions are pure: `handle_event` only updates fields and returns the
/// command the driver must execute.
pub struct MonitorState {
    pub snapshot: Option<MetricsSnapshot>,
    pub history: MetricsHistory,
    pub enrichment: Enrichment,
    pub show_trends: bool,
    pub should_quit: bool,
    pub interval_ms: u64,
    collecting: bool,
    ticks: u64,
    collect_every_ticks: u64,
}

impl MonitorState {
    pub fn new(config: &Config) -> crate::Result<Self> {
        Ok(Self {
            snapshot: None,
            history: MetricsHistory::with_capacity(config.history_capacity)?,
            enrichment: Enrichment::default(),
            show_trends: true,
            should_quit: false,
            interval_ms: config.tick_interval_ms,
            collecting: false,
            ticks: 0,
            collect_every_ticks: u64::from(config.collect_every_ticks.max(1)),
        })
    }

    /// Command for the first cycle, issued before any tick
    pub fn start(&mut self) -> Command {
        self.begin_collect()
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    pub fn handle_event(&mut self, event: MonitorEvent) -> Command {
        if self.should_quit {
            return Command::Quit;
        }

        match event {
            MonitorEvent::Tick => {
                self.ticks += 1;
                if self.ticks % self.collect_every_ticks == 0 {
                    self.begin_collect()
                } else {
                    Command::None
                }
            }
            MonitorEvent::RefreshRequested => self.begin_collect(),
            MonitorEvent::MetricsReady(snapshot) => {
                self.collecting = false;
                self.history.record(&snapshot);
                self.snapshot = Some(*snapshot);
                Command::None
            }
            MonitorEvent::ToggleDisplay => {
                self.show_trends = !self.show_trends;
                Command::None
            }
            MonitorEvent::Quit => {
                self.should_quit = true;
                Command::Quit
            }
        }
    }

    // At most one cycle is in flight; requests made meanwhile are dropped.
    fn begin_collect(&mut self) -> Command {
        if self.collecting {
            log::debug!("collection already running, skipping request");
            return Command::None;
        }
        self.collecting = true;
        Command::Collect
    }
}

/// Restores the terminal when dropped, including on early error returns.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the monitor TUI until the user quits.
pub async fn run_monitor_app<P: ProbeSet>(
    config: Config,
    collector: MetricsCollector<P>,
) -> Result<()> {
    let mut state = MonitorState::new(&config).context("Invalid monitor configuration")?;
    let collector = Arc::new(collector);
    let deadline = config.collect_deadline();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<MonitorEvent>();
    let stop = Arc::new(AtomicBool::new(false));

    let mut guard = TerminalGuard::new()?;

    let input = spawn_input_thread(event_tx.clone(), Arc::clone(&stop));
    let ticker = tokio::spawn(tick_task(event_tx.clone(), config.tick_interval()));

    let (enrich_tx, mut enrich_rx) = watch::channel(Enrichment::default());
    let enricher = tokio::spawn(async move {
        let _ = enrich_tx.send(enrich().await);
    });

    let mut command = state.start();
    let result = loop {
        match command {
            Command::Collect => {
                let collector = Arc::clone(&collector);
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    let snapshot = collector.collect(deadline).await;
                    let _ = tx.send(MonitorEvent::MetricsReady(Box::new(snapshot)));
                });
            }
            Command::Quit => break Ok(()),
            Command::None => {}
        }

        if enrich_rx.has_changed().unwrap_or(false) {
            state.enrichment = enrich_rx.borrow_and_update().clone();
        }

        if let Err(e) = guard.terminal.draw(|frame| render_ui(frame, &state)) {
            break Err(anyhow::Error::new(e).context("Failed to draw frame"));
        }

        let Some(event) = event_rx.recv().await else {
            break Ok(());
        };
        command = state.handle_event(event);
    };

    stop.store(true, Ordering::Relaxed);
    ticker.abort();
    enricher.abort();
    drop(guard);
    let _ = input.join();

    result
}

async fn tick_task(tx: mpsc::UnboundedSender<MonitorEvent>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        if tx.send(MonitorEvent::Tick).is_err() {
            break;
        }
    }
}

fn spawn_input_thread(
    tx: mpsc::UnboundedSender<MonitorEvent>,
    stop: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    log::error!("terminal event poll failed: {}", e);
                    let _ = tx.send(MonitorEvent::Quit);
                    break;
                }
            }

            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("terminal event read failed: {}", e);
                    let _ = tx.send(MonitorEvent::Quit);
                    break;
                }
            };

            if let Some(monitor_event) = map_key(key) {
                if tx.send(monitor_event).is_err() {
                    break;
                }
            }
        }
    })
}
