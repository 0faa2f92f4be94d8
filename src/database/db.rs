//! SQLite-backed review store
//!
//! Handles database initialization, CRUD operations for review records,
//! and the simulated clock used to fast-forward schedules.

use super::store::ReviewStore;
use crate::clock::{self, DAY_MS};
use crate::error::Result;
use crate::models::{Quality, ReviewRecord, advance, create_record};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const RECORD_COLUMNS: &str = "item_id, ease_factor, interval_days, repetitions, last_review_time, \
     next_review_time, total_reviews, correct_count, incorrect_count";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file and its tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_tables(&conn)?;
        log::info!("opened review database at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Number of days the simulated clock runs ahead of the wall clock.
    pub fn day_offset(&self) -> Result<i64> {
        let value: String = self.conn.query_row(
            "SELECT value FROM app_state WHERE key = 'day_offset'",
            [],
            |row| row.get(0),
        )?;
        match value.parse::<i64>() {
            Ok(offset) => Ok(offset),
            Err(_) => {
                log::warn!("corrupt day_offset '{}' in app_state, using 0", value);
                Ok(0)
            }
        }
    }

    /// Moves the simulated clock forward by 24 hours.
    pub fn advance_day(&self) -> Result<()> {
        let offset = self.day_offset()? + 1;
        self.conn.execute(
            "UPDATE app_state SET value = ?1 WHERE key = 'day_offset'",
            params![offset.to_string()],
        )?;
        log::info!("simulated clock is now {} day(s) ahead", offset);
        Ok(())
    }

    /// `wall_clock` shifted by the simulated day offset.
    pub fn simulated_time(&self, wall_clock: i64) -> Result<i64> {
        Ok(wall_clock + self.day_offset()? * DAY_MS)
    }

    /// Current time as seen by the schedules in this database.
    pub fn current_time(&self) -> Result<i64> {
        self.simulated_time(clock::now_millis())
    }

    /// Get-or-create, advance and write back in one transaction, so concurrent
    /// writers to the same file cannot lose an update.
    ///
    /// The write lock is taken before the read; a second writer waits up to
    /// `BUSY_TIMEOUT` instead of failing on lock upgrade.
    pub fn record_review(
        &mut self,
        item_id: &str,
        quality: Quality,
        now: i64,
    ) -> Result<ReviewRecord> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let record = get_record(&tx, item_id)?.unwrap_or_else(|| create_record(item_id, now));
        let updated = advance(&record, quality, now);
        put_record(&tx, &updated)?;
        tx.commit()?;
        Ok(updated)
    }
}

/// Creates tables for review records and app state.
fn init_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_records (
            item_id TEXT PRIMARY KEY,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetitions INTEGER NOT NULL DEFAULT 0,
            last_review_time INTEGER NOT NULL,
            next_review_time INTEGER NOT NULL,
            total_reviews INTEGER NOT NULL DEFAULT 0,
            correct_count INTEGER NOT NULL DEFAULT 0,
            incorrect_count INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('day_offset', '0')",
        (),
    )?;

    Ok(())
}

fn row_to_record(row: &Row) -> rusqlite::Result<ReviewRecord> {
    Ok(ReviewRecord {
        item_id: row.get(0)?,
        ease_factor: row.get(1)?,
        interval: row.get(2)?,
        repetitions: row.get(3)?,
        last_review_time: row.get(4)?,
        next_review_time: row.get(5)?,
        total_reviews: row.get(6)?,
        correct_count: row.get(7)?,
        incorrect_count: row.get(8)?,
    })
}

fn get_record(conn: &Connection, item_id: &str) -> Result<Option<ReviewRecord>> {
    let record = conn
        .query_row(
            &format!("SELECT {} FROM review_records WHERE item_id = ?1", RECORD_COLUMNS),
            params![item_id],
            row_to_record,
        )
        .optional()?;
    Ok(record)
}

fn put_record(conn: &Connection, record: &ReviewRecord) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO review_records ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            RECORD_COLUMNS
        ),
        params![
            record.item_id,
            record.ease_factor,
            record.interval,
            record.repetitions,
            record.last_review_time,
            record.next_review_time,
            record.total_reviews,
            record.correct_count,
            record.incorrect_count
        ],
    )?;
    log::debug!("stored review record {}", record.item_id);
    Ok(())
}

impl ReviewStore for SqliteStore {
    fn get(&self, item_id: &str) -> Result<Option<ReviewRecord>> {
        get_record(&self.conn, item_id)
    }

    fn put(&mut self, record: &ReviewRecord) -> Result<()> {
        put_record(&self.conn, record)
    }

    fn list(&self) -> Result<Vec<ReviewRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM review_records ORDER BY item_id",
            RECORD_COLUMNS
        ))?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn delete(&mut self, item_id: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM review_records WHERE item_id = ?1",
            params![item_id],
        )?;
        Ok(removed > 0)
    }

    fn clear(&mut self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM review_records", ())?;
        log::info!("cleared {} review records", removed);
        Ok(())
    }

    /// Clear and insert in one transaction; on error nothing changes.
    fn replace_all(&mut self, records: &[ReviewRecord]) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM review_records", ())?;
        for record in records {
            put_record(&tx, record)?;
        }
        tx.commit()?;
        log::info!("replaced review records with {} record(s)", records.len());
        Ok(())
    }
}
