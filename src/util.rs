use std::time::Duration;

use unicode_width::UnicodeWidthStr;

/// Seconds with centisecond resolution, e.g. `5.23s`
pub fn format_seconds(secs: f64) -> String {
    format!("{:.2}s", secs)
}

pub fn format_duration(d: Duration) -> String {
    format_seconds(d.as_secs_f64())
}

/// Best-time label for a menu entry, `None` when nothing is recorded
pub fn format_best(best: Option<f64>) -> Option<String> {
    best.map(|b| format!("best {}", format_seconds(b)))
}

/// Left-align `s` in a column `width` terminal cells wide
pub fn pad_to_width(s: &str, width: usize) -> String {
    let used = s.width();
    if used >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - used))
    }
}
