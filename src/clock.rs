//! Millisecond timestamps used throughout the scheduler.

use chrono::{DateTime, Local, Utc};

/// Milliseconds in one scheduling day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Formats epoch milliseconds as a local `YYYY-MM-DD HH:MM` string.
pub fn format_timestamp(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "invalid date".to_string(),
    }
}
