//! Moving a formula record forward after one answer.
//!
//! A passing grade (3 and up) extends the streak: the first gap is one day,
//! the second six, and after that the previous gap is stretched by the ease
//! factor. A failing grade drops the streak to zero and brings the formula back
//! tomorrow. Every answer nudges the ease factor, which stops at 1.3.

use super::quality::map_user_signal_to_quality;
use super::review_record::MIN_EASE_FACTOR;
use super::{Quality, ReviewRecord};
use crate::clock::DAY_MS;

/// Interval after the first successful review, in days.
const FIRST_INTERVAL: u32 = 1;
/// Interval after the second successful review, in days.
const SECOND_INTERVAL: u32 = 6;

/// Ease factor after a review of the given quality.
fn next_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let miss = (Quality::MAX - quality.value()) as f64;
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

/// Computes the record that results from reviewing `record` at `now` with `quality`.
///
/// Every field is derived from the same quality and the pre-review ease factor;
/// the input is left untouched.
pub fn advance(record: &ReviewRecord, quality: Quality, now: i64) -> ReviewRecord {
    let ease_factor = next_ease_factor(record.ease_factor, quality);
    let success = quality.is_success();

    let (interval, repetitions) = if success {
        let interval = match record.repetitions {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            _ => (record.interval as f64 * ease_factor).round() as u32,
        };
        (interval, record.repetitions + 1)
    } else {
        // Start the learning cycle over
        (FIRST_INTERVAL, 0)
    };

    log::debug!(
        "review {}: q={} ef {:.2} -> {:.2}, interval {} -> {}",
        record.item_id,
        quality,
        record.ease_factor,
        ease_factor,
        record.interval,
        interval
    );

    ReviewRecord {
        item_id: record.item_id.clone(),
        ease_factor,
        interval,
        repetitions,
        last_review_time: now,
        next_review_time: now + interval as i64 * DAY_MS,
        total_reviews: record.total_reviews + 1,
        correct_count: record.correct_count + success as u32,
        incorrect_count: record.incorrect_count + (!success) as u32,
    }
}

/// Intervals (in days) each answer would produce: forgot, forgot after
/// revealing, remembered after revealing, remembered outright.
/// Used to label answer buttons.
pub fn preview_intervals(record: &ReviewRecord, now: i64) -> [u32; 4] {
    [(false, false), (false, true), (true, true), (true, false)]
        .map(|(remembered, revealed)| {
            advance(record, map_user_signal_to_quality(remembered, revealed), now).interval
        })
}
