//! Terminal User Interface for system monitoring.
//!
//! Provides a real-time dashboard using ratatui, driven by an event-based
//! refresh loop.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_monitor_app, Command, MonitorState};
pub use event_handler::{map_key, MonitorEvent};
