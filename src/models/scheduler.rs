//! Due detection, mastery classification and review ordering.
//!
//! Everything here is recomputed from the records passed in; nothing is cached.

use super::ReviewRecord;
use crate::clock::DAY_MS;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Repetitions needed before a record leaves the learning state.
const LEARNING_REPETITIONS: u32 = 3;
/// Minimum interval (days) for a record to count as mastered.
const MASTERED_INTERVAL: u32 = 21;
/// Minimum mastery score for a record to count as mastered.
const MASTERED_SCORE: u8 = 80;
/// Interval (days) at which the interval half of mastery is maxed out.
const FULL_CONFIDENCE_INTERVAL: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewState {
    New,
    Learning,
    Review,
    Mastered,
}

impl ReviewState {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewState::New => "new",
            ReviewState::Learning => "learning",
            ReviewState::Review => "review",
            ReviewState::Mastered => "mastered",
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Display summary of a record at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub state: ReviewState,
    /// Negative when overdue.
    pub days_until_review: i64,
    /// 0-100
    pub mastery: u8,
}

impl StatusView {
    /// Status of an item that has no record yet.
    pub fn unseen() -> Self {
        Self {
            state: ReviewState::New,
            days_until_review: 0,
            mastery: 0,
        }
    }
}

pub fn is_due(record: &ReviewRecord, now: i64) -> bool {
    now >= record.next_review_time
}

pub fn due_count(records: &[ReviewRecord], now: i64) -> usize {
    records.iter().filter(|r| is_due(r, now)).count()
}

/// Blends accuracy and interval length into a 0-100 score. Zero before any review.
pub fn mastery(record: &ReviewRecord) -> u8 {
    let Some(accuracy) = record.accuracy() else {
        return 0;
    };
    let interval_factor = (record.interval as f64 / FULL_CONFIDENCE_INTERVAL).min(1.0);
    (accuracy * 50.0 + interval_factor * 50.0).round().min(100.0) as u8
}

pub fn status(record: &ReviewRecord, now: i64) -> StatusView {
    let days_until_review =
        ((record.next_review_time - now) as f64 / DAY_MS as f64).ceil() as i64;
    let mastery = mastery(record);

    let state = if record.total_reviews == 0 {
        ReviewState::New
    } else if record.repetitions < LEARNING_REPETITIONS {
        ReviewState::Learning
    } else if record.interval >= MASTERED_INTERVAL && mastery >= MASTERED_SCORE {
        ReviewState::Mastered
    } else {
        ReviewState::Review
    };

    StatusView {
        state,
        days_until_review,
        mastery,
    }
}

/// Review order: most overdue first, then lowest ease factor, then shortest interval.
fn priority_order(a: &ReviewRecord, b: &ReviewRecord, now: i64) -> Ordering {
    let overdue_a = now - a.next_review_time;
    let overdue_b = now - b.next_review_time;
    overdue_b
        .cmp(&overdue_a)
        .then_with(|| a.ease_factor.total_cmp(&b.ease_factor))
        .then_with(|| a.interval.cmp(&b.interval))
}

/// Due records only, in the order they should be reviewed.
pub fn prioritize(records: &[ReviewRecord], now: i64) -> Vec<ReviewRecord> {
    let mut due: Vec<ReviewRecord> = records
        .iter()
        .filter(|r| is_due(r, now))
        .cloned()
        .collect();
    due.sort_by(|a, b| priority_order(a, b, now));
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Quality, advance, create_record};

    fn reviewed(item_id: &str, qualities: &[i32]) -> ReviewRecord {
        qualities
            .iter()
            .fold(create_record(item_id, 0), |record, &q| {
                advance(&record, Quality::clamped(q), 0)
            })
    }

    fn due_at(item_id: &str, next_review_time: i64, ease_factor: f64, interval: u32) -> ReviewRecord {
        ReviewRecord {
            next_review_time,
            ease_factor,
            interval,
            ..create_record(item_id, 0)
        }
    }

    #[test]
    fn test_new_record_due_after_creation() {
        let record = create_record("power-rule", 0);
        assert!(is_due(&record, 0));
        assert!(is_due(&record, 1));
        assert!(!is_due(&record, -1));
    }

    #[test]
    fn test_due_count() {
        let records = vec![
            due_at("a", 100, 2.5, 1),
            due_at("b", 200, 2.5, 1),
            due_at("c", 300, 2.5, 1),
        ];
        assert_eq!(due_count(&records, 50), 0);
        assert_eq!(due_count(&records, 200), 2);
        assert_eq!(due_count(&records, 1000), 3);
        assert_eq!(due_count(&[], 1000), 0);
    }

    #[test]
    fn test_new_state_iff_never_reviewed() {
        let fresh = create_record("quotient-rule", 0);
        assert_eq!(status(&fresh, 0), StatusView::unseen());

        let once = reviewed("quotient-rule", &[0]);
        assert_eq!(status(&once, 0).state, ReviewState::Learning);
    }

    #[test]
    fn test_days_until_review_rounds_up() {
        let record = due_at("x", DAY_MS + 1, 2.5, 1);
        assert_eq!(status(&record, 0).days_until_review, 2);

        let exact = due_at("x", 3 * DAY_MS, 2.5, 1);
        assert_eq!(status(&exact, 0).days_until_review, 3);
    }

    #[test]
    fn test_days_until_review_negative_when_overdue() {
        let record = due_at("x", 0, 2.5, 1);
        assert_eq!(status(&record, 2 * DAY_MS).days_until_review, -2);
        // -1.5 days rounds up to -1
        assert_eq!(status(&record, DAY_MS + DAY_MS / 2).days_until_review, -1);
    }

    #[test]
    fn test_mastery_blend() {
        let mut record = create_record("x", 0);
        assert_eq!(mastery(&record), 0);

        record.total_reviews = 4;
        record.correct_count = 3;
        record.incorrect_count = 1;
        record.interval = 15;
        // 0.75 * 50 + 0.5 * 50 = 62.5
        assert_eq!(mastery(&record), 63);

        record.interval = 90;
        // interval part caps at 50
        assert_eq!(mastery(&record), 88);
    }

    #[test]
    fn test_learning_until_three_repetitions() {
        let record = reviewed("x", &[5, 5]);
        assert_eq!(status(&record, 0).state, ReviewState::Learning);

        let record = reviewed("x", &[5, 5, 5]);
        // interval 17 < 21
        assert_eq!(status(&record, 0).state, ReviewState::Review);
    }

    #[test]
    fn test_mastered_needs_interval_and_score() {
        let record = reviewed("x", &[5, 5, 5, 5]);
        assert!(record.interval >= 21);
        assert_eq!(status(&record, 0).state, ReviewState::Mastered);

        let mut shaky = record.clone();
        shaky.correct_count = 1;
        shaky.incorrect_count = 3;
        // 0.25 * 50 + 50 = 63
        assert_eq!(status(&shaky, 0).state, ReviewState::Review);
    }

    #[test]
    fn test_failure_drops_back_to_learning() {
        let record = reviewed("x", &[5, 5, 5, 5, 1]);
        assert_eq!(record.repetitions, 0);
        assert_eq!(status(&record, 0).state, ReviewState::Learning);
    }

    #[test]
    fn test_prioritize_filters_and_orders() {
        let now = 10_000;
        let records = vec![
            due_at("not-due", now + 1, 1.3, 1),
            due_at("slightly-overdue", now - 10, 1.3, 1),
            due_at("very-overdue", now - 5000, 2.5, 30),
            due_at("tie-easy", now - 100, 2.8, 1),
            due_at("tie-hard-long", now - 100, 1.8, 20),
            due_at("tie-hard-short", now - 100, 1.8, 3),
        ];

        let order: Vec<_> = prioritize(&records, now)
            .into_iter()
            .map(|r| r.item_id)
            .collect();

        assert_eq!(
            order,
            vec![
                "very-overdue",
                "tie-hard-short",
                "tie-hard-long",
                "tie-easy",
                "slightly-overdue",
            ]
        );
    }

    #[test]
    fn test_prioritize_only_returns_due_records() {
        let records = vec![due_at("a", 5, 2.5, 1), due_at("b", 50, 2.5, 1)];
        let due = prioritize(&records, 10);
        assert_eq!(due.len(), 1);
        assert!(due.iter().all(|r| is_due(r, 10)));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let records = vec![
            due_at("a", 5, 2.1, 1),
            due_at("b", 5, 2.1, 4),
            due_at("c", 1, 2.9, 1),
        ];
        assert_eq!(prioritize(&records, 10), prioritize(&records, 10));
        assert_eq!(status(&records[0], 10), status(&records[0], 10));
    }
}
