//! JSON backup/restore of review records.
//! Saves every record in a store to a file and loads a file back into a store.

use crate::database::ReviewStore;
use crate::error::{Result, ReviewError};
use crate::models::ReviewRecord;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub version: u32,
    /// Epoch milliseconds.
    pub exported_at: i64,
    pub records: Vec<ReviewRecord>,
}

/// File name for a backup taken at `now`: `formula-review-YYYYMMDD-HHMMSS.json`.
pub fn backup_file_name(now: i64) -> String {
    let stamp = DateTime::<Utc>::from_timestamp_millis(now)
        .map(|utc| utc.with_timezone(&Local).format("%Y%m%d-%H%M%S").to_string())
        .unwrap_or_else(|| now.to_string());
    format!("formula-review-{}.json", stamp)
}

/// Writes every record in the store to `path`. Returns the number of records written.
pub fn export_to_path<S: ReviewStore + ?Sized>(store: &S, path: &Path, now: i64) -> Result<usize> {
    let mut records = store.list()?;
    records.sort_by(|a, b| a.item_id.cmp(&b.item_id));

    let backup = BackupFile {
        version: BACKUP_VERSION,
        exported_at: now,
        records,
    };
    let json_string = serde_json::to_string_pretty(&backup)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json_string)?;

    log::info!("exported {} review records to {}", backup.records.len(), path.display());
    Ok(backup.records.len())
}

/// Reads and checks a backup file without touching any store.
/// Every record must satisfy the review record invariants and ids must be unique.
pub fn read_backup(path: &Path) -> Result<BackupFile> {
    let contents = fs::read_to_string(path)?;
    let backup: BackupFile = serde_json::from_str(&contents)?;
    if backup.version != BACKUP_VERSION {
        return Err(ReviewError::UnsupportedBackup(backup.version));
    }

    let mut seen = HashSet::new();
    for record in &backup.records {
        record
            .validate()
            .map_err(|reason| ReviewError::InvalidRecord(format!("{}: {}", record.item_id, reason)))?;
        if !seen.insert(record.item_id.as_str()) {
            return Err(ReviewError::InvalidRecord(format!(
                "{}: appears more than once",
                record.item_id
            )));
        }
    }
    Ok(backup)
}

/// Replaces the store's contents with the records in the backup at `path`.
/// The store is left untouched if the file cannot be read or fails validation;
/// stores with transactions also roll back a write that fails halfway.
pub fn import_from_path<S: ReviewStore + ?Sized>(store: &mut S, path: &Path) -> Result<usize> {
    let backup = read_backup(path)?;
    store.replace_all(&backup.records)?;

    log::info!("imported {} review records from {}", backup.records.len(), path.display());
    Ok(backup.records.len())
}
