use ratatui::{prelude::*, widgets::Gauge};

/// Color for a utilization percentage
pub fn percent_color(value: f64) -> Color {
    match value {
        v if v > 85.0 => Color::Red,
        v if v > 70.0 => Color::Yellow,
        _ => Color::Green,
    }
}

/// Color for a health score
pub fn health_color(score: u8) -> Color {
    match score {
        s if s < 50 => Color::Red,
        s if s < 70 => Color::Yellow,
        _ => Color::Green,
    }
}

/// Create a gauge colored by utilization
pub fn percent_gauge<'a>(value: f64, label: String) -> Gauge<'a> {
    Gauge::default()
        .gauge_style(Style::default().fg(percent_color(value)).bg(Color::Black))
        .ratio((value / 100.0).clamp(0.0, 1.0))
        .label(label)
}
