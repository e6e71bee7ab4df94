use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::system_monitor::MetricsSnapshot;

/// Events driving the monitor refresh loop
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// Timer tick
    Tick,
    /// Manual refresh (`r`)
    RefreshRequested,
    /// A collection cycle finished
    MetricsReady(Box<MetricsSnapshot>),
    /// Show or hide the trends panel (`c`)
    ToggleDisplay,
    /// Quit the application
    Quit,
}

/// Map a key press to a monitor event.
pub fn map_key(key: KeyEvent) -> Option<MonitorEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(MonitorEvent::Quit)
        }
        KeyCode::Char('q') => Some(MonitorEvent::Quit),
        KeyCode::Char('r') => Some(MonitorEvent::RefreshRequested),
        KeyCode::Char('c') => Some(MonitorEvent::ToggleDisplay),
        _ => None,
    }
}
