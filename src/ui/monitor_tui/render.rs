use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table},
};

use super::app::MonitorState;
use super::widgets::{health_color, percent_color, percent_gauge};
use crate::core::system_monitor::{HealthStatus, MetricsSnapshot};
use crate::ui::formatters::{format_bytes, format_duration, format_rate, truncate};

/// Interfaces shown in the network panel
const NETWORK_ROWS: usize = 3;

/// Main render function
pub fn render_ui(frame: &mut Frame, state: &MonitorState) {
    let area = frame.area();

    let Some(metrics) = state.snapshot.as_ref() else {
        render_loading(frame, area);
        return;
    };

    let mut constraints = vec![
        Constraint::Length(3),      // Header
        Constraint::Length(3),      // Health
        Constraint::Percentage(30), // CPU
        Constraint::Length(6),      // Memory + Disks
        Constraint::Min(7),         // Processes + Network
    ];
    if state.show_trends {
        constraints.push(Constraint::Percentage(20));
    }
    constraints.push(Constraint::Length(1)); // Footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(frame, chunks[0], state, metrics);
    render_health(frame, chunks[1], metrics);
    render_cpu_section(frame, chunks[2], state, metrics);
    render_memory_disk_section(frame, chunks[3], metrics);
    render_processes_network_section(frame, chunks[4], metrics);
    if state.show_trends {
        render_trends(frame, chunks[5], state);
    }
    render_footer(frame, chunks[chunks.len() - 1]);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let para = Paragraph::new("Loading system metrics...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" hostvitals "));
    frame.render_widget(para, area);
}

fn render_header(frame: &mut Frame, area: Rect, state: &MonitorState, metrics: &MetricsSnapshot) {
    let battery = match state.enrichment.battery {
        Some(b) if b.charging => format!(" │ Battery: {:.0}% (charging)", b.percent),
        Some(b) => format!(" │ Battery: {:.0}%", b.percent),
        None => String::new(),
    };

    let title = format!(
        " {} │ {} │ Uptime: {}{} │ Refresh: {}ms ",
        metrics.hostname,
        state.enrichment.os_version,
        format_duration(metrics.uptime_secs),
        battery,
        state.interval_ms
    );

    let info = Paragraph::new(format!(
        "{} ({}) │ Collected {}",
        metrics.platform,
        metrics.os,
        metrics
            .collected_at
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
    ))
    .style(Style::default().fg(Color::DarkGray))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(info, area);
}

fn render_health(frame: &mut Frame, area: Rect, metrics: &MetricsSnapshot) {
    let color = health_color(metrics.health_score);
    let status = HealthStatus::from_score(metrics.health_score);

    let line = Line::from(vec![
        Span::styled(
            format!("{}/100 {}", metrics.health_score, status.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(metrics.health_message.clone(), Style::default().fg(color)),
    ]);

    let para = Paragraph::new(line).block(
        Block::default()
            .title(" Health ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(para, area);
}

fn render_cpu_section(frame: &mut Frame, area: Rect, state: &MonitorState, metrics: &MetricsSnapshot) {
    let block = Block::default()
        .title(format!(
            " CPU: {} ({} cores) │ {:.1}% ",
            metrics.cpu_model, metrics.cpu_cores, metrics.cpu_percent
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    render_cpu_cores(frame, chunks[0], metrics);
    render_history_chart(
        frame,
        chunks[1],
        "CPU History",
        &state.history.cpu_as_u64(),
        Color::Cyan,
    );
}

fn render_cpu_cores(frame: &mut Frame, area: Rect, metrics: &MetricsSnapshot) {
    let rows = area.height as usize;
    if rows == 0 {
        return;
    }

    // Overall gauge first, then as many cores as fit
    let cores_to_show = rows.saturating_sub(1).min(metrics.cpu_per_core.len());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); cores_to_show + 1])
        .split(area);

    frame.render_widget(
        percent_gauge(
            metrics.cpu_percent,
            format!("Total [{:>5.1}%]", metrics.cpu_percent),
        ),
        layout[0],
    );

    for (i, usage) in metrics.cpu_per_core.iter().take(cores_to_show).enumerate() {
        frame.render_widget(
            percent_gauge(*usage, format!("C{:02} [{:>5.1}%]", i, usage)),
            layout[i + 1],
        );
    }
}

fn render_history_chart(frame: &mut Frame, area: Rect, title: &str, history: &[u64], color: Color) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if history.is_empty() || area.width <= 4 {
        frame.render_widget(block, area);
        return;
    }

    let bar_width: u16 = 1;
    let bar_gap: u16 = 1;
    let inner_width = area.width.saturating_sub(2) as usize;
    let max_bars = (inner_width / (bar_width + bar_gap) as usize).min(history.len());

    let start = history.len() - max_bars;
    let data: Vec<(&str, u64)> = history[start..].iter().map(|&v| ("", v)).collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Vertical)
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color))
        .data(&data)
        .max(1000); // Percent scaled by 10

    frame.render_widget(chart, area);
}

fn render_memory_disk_section(frame: &mut Frame, area: Rect, metrics: &MetricsSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mem_block = Block::default().title(" Memory ").borders(Borders::ALL);
    let mem_inner = mem_block.inner(chunks[0]);
    frame.render_widget(mem_block, chunks[0]);

    if mem_inner.height >= 2 {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(mem_inner);

        frame.render_widget(
            percent_gauge(
                metrics.mem_percent,
                format!(
                    "RAM  {} / {} ({:.1}%)",
                    format_bytes(metrics.mem_used),
                    format_bytes(metrics.mem_total),
                    metrics.mem_percent
                ),
            ),
            rows[0],
        );
        frame.render_widget(
            percent_gauge(
                metrics.swap_percent,
                format!(
                    "Swap {} / {} ({:.1}%)",
                    format_bytes(metrics.swap_used),
                    format_bytes(metrics.swap_total),
                    metrics.swap_percent
                ),
            ),
            rows[1],
        );
    }

    let disk_block = Block::default().title(" Disks ").borders(Borders::ALL);
    let disk_inner = disk_block.inner(chunks[1]);
    frame.render_widget(disk_block, chunks[1]);

    if metrics.disks.is_empty() {
        let none = Paragraph::new("No disks reported").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(none, disk_inner);
        return;
    }

    let shown = (disk_inner.height as usize).min(metrics.disks.len());
    if shown == 0 {
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); shown])
        .split(disk_inner);

    for (i, disk) in metrics.disks.iter().take(shown).enumerate() {
        let label = format!(
            "{} {} / {} ({:.1}%)",
            truncate(&disk.mount_point, 12),
            format_bytes(disk.used_bytes),
            format_bytes(disk.total_bytes),
            disk.used_percent
        );
        frame.render_widget(percent_gauge(disk.used_percent, label), rows[i]);
    }
}

fn render_processes_network_section(frame: &mut Frame, area: Rect, metrics: &MetricsSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let header = Row::new(vec![
        Cell::from("PID").style(bold),
        Cell::from("Name").style(bold),
        Cell::from("CPU %").style(bold),
        Cell::from("Mem %").style(bold),
    ])
    .height(1);

    let rows: Vec<Row> = metrics
        .top_processes
        .iter()
        .map(|proc| {
            Row::new(vec![
                Cell::from(proc.pid.to_string()),
                Cell::from(truncate(&proc.name, 24)),
                Cell::from(format!("{:.1}", proc.cpu_percent))
                    .style(Style::default().fg(percent_color(proc.cpu_percent))),
                Cell::from(format!("{:.1}", proc.memory_percent)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(50),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(Block::default().title(" Top Processes ").borders(Borders::ALL));
    frame.render_widget(table, chunks[0]);

    let net_header = Row::new(vec![
        Cell::from("Interface").style(bold),
        Cell::from("Received").style(bold),
        Cell::from("Sent").style(bold),
    ])
    .height(1);

    let net_rows: Vec<Row> = metrics
        .networks
        .iter()
        .take(NETWORK_ROWS)
        .map(|net| {
            Row::new(vec![
                Cell::from(truncate(&net.interface, 16)),
                Cell::from(format_bytes(net.bytes_recv)),
                Cell::from(format_bytes(net.bytes_sent)),
            ])
        })
        .collect();

    let net_table = Table::new(
        net_rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(net_header)
    .block(Block::default().title(" Network ").borders(Borders::ALL));
    frame.render_widget(net_table, chunks[1]);
}

fn render_trends(frame: &mut Frame, area: Rect, state: &MonitorState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_history_chart(
        frame,
        chunks[0],
        "Memory History",
        &state.history.memory_as_u64(),
        Color::Magenta,
    );

    let history = &state.history;
    let lines = vec![
        Line::from(format!(
            "Samples: {} / {}",
            history.cpu_usage.len(),
            history.cpu_usage.capacity()
        )),
        Line::from(format!(
            "CPU avg: {:.1}%",
            average(&history.cpu_usage.slice())
        )),
        Line::from(format!(
            "Memory avg: {:.1}%",
            average(&history.memory_usage.slice())
        )),
        Line::from(format!(
            "Net ↓ {}",
            history
                .network_rx
                .latest()
                .map(format_rate)
                .unwrap_or_else(|| "-".to_string())
        )),
        Line::from(format!(
            "Net ↑ {}",
            history
                .network_tx
                .latest()
                .map(format_rate)
                .unwrap_or_else(|| "-".to_string())
        )),
    ];

    let para =
        Paragraph::new(lines).block(Block::default().title(" Trends ").borders(Borders::ALL));
    frame.render_widget(para, chunks[1]);
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let help = " q/Ctrl-C: Quit │ r: Refresh │ c: Toggle trends ";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
