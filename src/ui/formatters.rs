use humansize::{format_size, WINDOWS};

/// Format a byte count in human-readable form (B, kB, MB, GB, ...)
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, WINDOWS)
}

/// Format a transfer rate given in bytes per second
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec.max(0.0) as u64))
}

/// Format an uptime in seconds as `Xd Yh`, `Xh Ym` or `Xm`
pub fn format_duration(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Shorten `text` to at most `max` characters, ending with `...` when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }

    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
