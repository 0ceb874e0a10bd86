//! Duration helpers: minute counts to "Xh Ym" labels.

use chrono::{DateTime, Utc};

/// Render a minute count as "Xh Ym", "Xh" or "Ym".
///
/// Negative or non-finite input renders as "N/A".
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes < 0.0 {
        return "N/A".to_string();
    }

    let mut hours = (minutes / 60.0).floor() as u64;
    let mut rest = (minutes % 60.0).round() as u64;
    // 59.6 rounds up to a whole hour.
    if rest == 60 {
        hours += 1;
        rest = 0;
    }

    match (hours, rest) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Fractional minutes elapsed from `start` to `end`.
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 60_000.0
}
