/// Format seconds as minutes with one decimal: "12.5 min"
pub(crate) fn format_minutes(seconds: f64) -> String {
    format!("{:.1} min", seconds / 60.0)
}

/// Format seconds as a compact human duration: "45s", "3m 05s", "2h 04m"
pub(crate) fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as i64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}

pub(crate) fn format_percentage(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", 100.0 * part as f64 / total as f64)
}
