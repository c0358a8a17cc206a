//! Formatting helpers for status and victory displays.

/// `MM:SS`, both fields zero padded, as shown on the status bar.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `M:SS` with unpadded minutes, as shown on the victory summary.
pub fn format_duration_short(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Share of pairs found, in percent. An empty board reports 0.
pub fn progress_percent(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    matched as f64 / total as f64 * 100.0
}
