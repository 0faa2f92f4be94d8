//! Review state of a single memorized item (usually a formula).
use serde::{Deserialize, Serialize};

/// Ease factor every new record starts with.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Ease factor never drops below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Scheduling state of one item. Timestamps are epoch milliseconds.
///
/// Fields are public for storage and display, but a record only moves forward
/// through [`advance`](super::sm2::advance), which returns a whole new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub item_id: String,
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: u32,
    /// Consecutive successful reviews since the last failure.
    pub repetitions: u32,
    pub last_review_time: i64,
    pub next_review_time: i64,
    pub total_reviews: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
}

/// Creates a record for an item seen for the first time. It is due immediately.
pub fn create_record(item_id: impl Into<String>, now: i64) -> ReviewRecord {
    ReviewRecord {
        item_id: item_id.into(),
        ease_factor: INITIAL_EASE_FACTOR,
        interval: 0,
        repetitions: 0,
        last_review_time: now,
        next_review_time: now,
        total_reviews: 0,
        correct_count: 0,
        incorrect_count: 0,
    }
}

impl ReviewRecord {
    /// Share of reviews answered correctly, `None` before the first review.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_reviews == 0 {
            None
        } else {
            Some(self.correct_count as f64 / self.total_reviews as f64)
        }
    }

    /// Checks the invariants `advance` maintains. Records coming from outside
    /// (backups, hand-edited files) must pass this before they are stored.
    pub fn validate(&self) -> Result<(), String> {
        if self.item_id.is_empty() {
            return Err("empty item id".to_string());
        }
        if !(self.ease_factor >= MIN_EASE_FACTOR && self.ease_factor.is_finite()) {
            return Err(format!(
                "ease factor {} below {}",
                self.ease_factor, MIN_EASE_FACTOR
            ));
        }
        let answered = self.correct_count as u64 + self.incorrect_count as u64;
        if answered != self.total_reviews as u64 {
            return Err(format!(
                "{} correct + {} incorrect != {} total reviews",
                self.correct_count, self.incorrect_count, self.total_reviews
            ));
        }
        if self.repetitions > self.correct_count {
            return Err(format!(
                "{} repetitions but only {} correct reviews",
                self.repetitions, self.correct_count
            ));
        }
        if self.next_review_time < self.last_review_time {
            return Err("next review time before last review time".to_string());
        }
        Ok(())
    }
}
