//! Formatting helpers for presenting metrics.

pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.0}%", value * 100.0)
    } else {
        "—".to_string()
    }
}

pub fn format_count(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.0}")
    } else {
        "—".to_string()
    }
}
