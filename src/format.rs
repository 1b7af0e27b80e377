//! Display helpers for distances and durations.

/// `"950 m"` below one kilometer, `"1.5 km"` above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        return format!("{} m", meters.round() as i64);
    }
    format!("{:.1} km", meters / 1000.0)
}

/// `"1h 30m"` from one hour upward, `"5 min"` below.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 {
        return format!("{}h {}m", hours, minutes);
    }
    format!("{} min", minutes)
}
