//! Formatting utilities
//!
//! Conversions between seconds, minutes and the strings the views print.
//! Callers guard against negative input; every function here is total over
//! unsigned values.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format seconds as a countdown clock, "MM:SS"
///
/// Minutes are not rolled over into hours, so 3600 seconds is "60:00".
pub fn clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format seconds as "Hh Mmin", or "Mmin" under an hour
pub fn human(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}min", hours, mins)
    } else {
        format!("{}min", mins)
    }
}

/// Short day label, e.g. "16 Oct"
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {}", date.day(), MONTHS[date.month0() as usize])
}

/// Saturates at `u32::MAX` instead of wrapping
pub fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

/// Format a timestamp as relative (e.g., "2m ago")
pub fn relative_time(dt: DateTime<Utc>) -> String {
    relative_time_from(dt, Utc::now())
}

pub fn relative_time_from(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(dt);

    if diff.num_seconds() < 60 {
        format!("{}s ago", diff.num_seconds().max(0))
    } else if diff.num_minutes() < 60 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_hours() < 24 {
        format!("{}h ago", diff.num_hours())
    } else {
        format!("{}d ago", diff.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_clock() {
        assert_eq!(clock(125), "02:05");
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(1500), "25:00");
        assert_eq!(clock(3661), "61:01");
    }

    #[test]
    fn test_human() {
        assert_eq!(human(3661), "1h 1min");
        assert_eq!(human(59), "0min");
        assert_eq!(human(1500), "25min");
        assert_eq!(human(7200), "2h 0min");
    }

    #[test]
    fn test_day_label() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(day_label(date), "16 Oct");
        let date = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(day_label(date), "3 Jan");
    }

    #[test]
    fn test_minutes_to_seconds() {
        assert_eq!(minutes_to_seconds(25), 1500);
        assert_eq!(minutes_to_seconds(0), 0);
        assert_eq!(minutes_to_seconds(80_000_000), u32::MAX);
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time_from(now - Duration::seconds(5), now), "5s ago");
        assert_eq!(relative_time_from(now - Duration::minutes(3), now), "3m ago");
        assert_eq!(relative_time_from(now - Duration::hours(2), now), "2h ago");
        assert_eq!(relative_time_from(now - Duration::days(4), now), "4d ago");
    }
}
