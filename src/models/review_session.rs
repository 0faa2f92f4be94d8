//! Review session over the items that are currently due.
//! Items answered "forgot" come back in a later round of the same session.

use super::quality::map_user_signal_to_quality;
use super::sm2::preview_intervals;
use super::ReviewRecord;
use crate::database::store::{self, ReviewStore};
use crate::error::Result;

/// Correct/incorrect tallies for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub correct: u32,
    pub incorrect: u32,
    pub rounds: usize,
}

pub struct ReviewSession<'a, S: ReviewStore> {
    store: &'a mut S,
    records: Vec<ReviewRecord>,
    remembered: Vec<bool>,
    current_round: Vec<usize>,
    current_index: usize,
    revealed: bool,
    round_number: usize,
    summary: SessionSummary,
}

impl<'a, S: ReviewStore> ReviewSession<'a, S> {
    /// Starts a session with every due record, most urgent first.
    pub fn from_due(store: &'a mut S, now: i64) -> Result<Self> {
        let records = store::due_items(&*store, now)?;
        log::info!("starting review session with {} due item(s)", records.len());
        Ok(Self::with_records(store, records))
    }

    /// Starts a session over the given records, in the given order.
    pub fn with_records(store: &'a mut S, records: Vec<ReviewRecord>) -> Self {
        let count = records.len();
        Self {
            store,
            records,
            remembered: vec![false; count],
            current_round: (0..count).collect(),
            current_index: 0,
            revealed: false,
            round_number: 1,
            summary: SessionSummary {
                rounds: 1,
                ..SessionSummary::default()
            },
        }
    }

    pub fn current(&self) -> Option<&ReviewRecord> {
        self.current_round
            .get(self.current_index)
            .and_then(|&idx| self.records.get(idx))
    }

    /// Shows the answer of the current item. Remembering it afterwards scores lower.
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Intervals each possible answer would give the current item.
    pub fn preview(&self, now: i64) -> Option<[u32; 4]> {
        self.current().map(|record| preview_intervals(record, now))
    }

    /// Records the answer for the current item, stores the new record and moves on.
    /// Returns the updated record, or `None` when the session is already over.
    pub fn answer(&mut self, remembered: bool, now: i64) -> Result<Option<ReviewRecord>> {
        let Some(&idx) = self.current_round.get(self.current_index) else {
            return Ok(None);
        };

        let quality = map_user_signal_to_quality(remembered, self.revealed);
        let item_id = self.records[idx].item_id.clone();
        let updated = store::record_review(&mut *self.store, &item_id, quality, now)?;

        if quality.is_success() {
            self.summary.correct += 1;
        } else {
            self.summary.incorrect += 1;
        }
        self.remembered[idx] = remembered;
        self.records[idx] = updated.clone();
        self.next_item();
        Ok(Some(updated))
    }

    fn next_item(&mut self) {
        self.revealed = false;
        if self.current_index + 1 < self.current_round.len() {
            self.current_index += 1;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the items that were forgotten.
    /// If none remain, the session is complete.
    fn start_next_round(&mut self) {
        let forgotten: Vec<usize> = self
            .current_round
            .iter()
            .copied()
            .filter(|&idx| !self.remembered[idx])
            .collect();

        if !forgotten.is_empty() {
            self.round_number += 1;
            self.summary.rounds = self.round_number;
        }
        self.current_round = forgotten;
        self.current_index = 0;
    }

    /// Items left in the current round, including the current one.
    pub fn remaining(&self) -> usize {
        self.current_round.len().saturating_sub(self.current_index)
    }

    /// Answers given so far.
    pub fn reviewed(&self) -> u32 {
        self.summary.correct + self.summary.incorrect
    }

    pub fn is_complete(&self) -> bool {
        self.current_round.is_empty()
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} items", self.round_number, self.current_round.len())
        } else {
            format!(
                "Round {} (retry): {} items",
                self.round_number,
                self.current_round.len()
            )
        }
    }
}
