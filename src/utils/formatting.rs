//! Formatting utilities used for CLI outputs.

use unicode_width::UnicodeWidthStr;

/// Pad to `width` terminal columns (not bytes).
pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", " ".repeat(width.saturating_sub(w)), s)
}

/// `7.5` → `"7.5h"`, `8.0` → `"8h"`.
pub fn format_hours(hours: f64) -> String {
    if (hours - hours.round()).abs() < 1e-9 {
        format!("{}h", hours.round() as i64)
    } else {
        format!("{:.1}h", hours)
    }
}

/// Text progress bar, e.g. `[######----]`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
