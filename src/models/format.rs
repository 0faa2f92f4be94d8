//! Human-readable review times.

use crate::clock::DAY_MS;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("in 1 {}", unit)
    } else {
        format!("in {} {}s", count, unit)
    }
}

/// Describes when a record is next due, relative to `now`.
pub fn format_next_review(next_review_time: i64, now: i64) -> String {
    let diff = next_review_time - now;
    if diff <= 0 {
        return "due now".to_string();
    }

    let days = diff / DAY_MS;
    let hours = diff / HOUR_MS;
    let minutes = diff / MINUTE_MS;

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else {
        plural(minutes, "minute")
    }
}

/// Compact interval label for answer buttons: `1d`, `2w`, `3mo`, ...
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_now() {
        assert_eq!(format_next_review(100, 100), "due now");
        assert_eq!(format_next_review(0, 100), "due now");
    }

    #[test]
    fn test_largest_unit_first() {
        assert_eq!(format_next_review(3 * DAY_MS + HOUR_MS, 0), "in 3 days");
        assert_eq!(format_next_review(DAY_MS, 0), "in 1 day");
        assert_eq!(format_next_review(5 * HOUR_MS + 59 * MINUTE_MS, 0), "in 5 hours");
        assert_eq!(format_next_review(MINUTE_MS, 0), "in 1 minute");
    }

    #[test]
    fn test_under_a_minute() {
        assert_eq!(format_next_review(30 * 1000, 0), "in 0 minutes");
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(6), "6d");
        assert_eq!(format_interval(16), "2w");
        assert_eq!(format_interval(45), "1mo");
        assert_eq!(format_interval(800), "2y");
    }
}
