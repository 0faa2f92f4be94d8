//! Record store abstraction and the operations built on top of it.

use crate::error::{Result, ReviewError};
use crate::models::{Quality, ReviewRecord, StatusView, advance, create_record, prioritize, status};
use std::collections::HashMap;

/// Key-value storage of review records, keyed by item id.
pub trait ReviewStore {
    fn get(&self, item_id: &str) -> Result<Option<ReviewRecord>>;

    /// Inserts or replaces the record for `record.item_id`.
    fn put(&mut self, record: &ReviewRecord) -> Result<()>;

    fn list(&self) -> Result<Vec<ReviewRecord>>;

    /// Returns true if a record was removed.
    fn delete(&mut self, item_id: &str) -> Result<bool>;

    fn clear(&mut self) -> Result<()>;

    /// Swaps the whole contents for `records`. Stores that support transactions
    /// override this so a failure leaves the old contents in place.
    fn replace_all(&mut self, records: &[ReviewRecord]) -> Result<()> {
        self.clear()?;
        for record in records {
            self.put(record)?;
        }
        Ok(())
    }
}

/// In-memory store, used for tests and as a scratch store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, ReviewRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ReviewStore for MemoryStore {
    fn get(&self, item_id: &str) -> Result<Option<ReviewRecord>> {
        Ok(self.records.get(item_id).cloned())
    }

    fn put(&mut self, record: &ReviewRecord) -> Result<()> {
        self.records.insert(record.item_id.clone(), record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<ReviewRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn delete(&mut self, item_id: &str) -> Result<bool> {
        Ok(self.records.remove(item_id).is_some())
    }

    fn clear(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}

/// Returns the stored record, creating and storing a fresh one if missing.
pub fn ensure_record<S: ReviewStore + ?Sized>(
    store: &mut S,
    item_id: &str,
    now: i64,
) -> Result<ReviewRecord> {
    if let Some(record) = store.get(item_id)? {
        return Ok(record);
    }
    let record = create_record(item_id, now);
    store.put(&record)?;
    log::debug!("created review record for {}", item_id);
    Ok(record)
}

/// Reviews an item: loads (or creates) its record, advances it and stores the result.
///
/// Callers sharing a store across threads must serialize calls for the same item.
pub fn record_review<S: ReviewStore + ?Sized>(
    store: &mut S,
    item_id: &str,
    quality: Quality,
    now: i64,
) -> Result<ReviewRecord> {
    let record = match store.get(item_id)? {
        Some(record) => record,
        None => create_record(item_id, now),
    };
    let updated = advance(&record, quality, now);
    store.put(&updated)?;
    Ok(updated)
}

/// Deletes the record of an item, failing if the item is not tracked.
pub fn delete_record<S: ReviewStore + ?Sized>(store: &mut S, item_id: &str) -> Result<()> {
    if store.delete(item_id)? {
        log::debug!("deleted review record for {}", item_id);
        Ok(())
    } else {
        Err(ReviewError::RecordNotFound(item_id.to_string()))
    }
}

/// Status of an item; items without a record are reported as new.
pub fn item_status<S: ReviewStore + ?Sized>(
    store: &S,
    item_id: &str,
    now: i64,
) -> Result<StatusView> {
    Ok(store
        .get(item_id)?
        .map_or_else(StatusView::unseen, |record| status(&record, now)))
}

/// Items never reviewed count as due.
pub fn item_is_due<S: ReviewStore + ?Sized>(store: &S, item_id: &str, now: i64) -> Result<bool> {
    Ok(store
        .get(item_id)?
        .map_or(true, |record| crate::models::is_due(&record, now)))
}

/// All due records in review order.
pub fn due_items<S: ReviewStore + ?Sized>(store: &S, now: i64) -> Result<Vec<ReviewRecord>> {
    Ok(prioritize(&store.list()?, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DAY_MS;
    use crate::models::ReviewState;

    fn q(value: i32) -> Quality {
        Quality::clamped(value)
    }

    #[test]
    fn test_memory_store_crud() {
        let mut store = MemoryStore::new();
        let record = create_record("euler-identity", 0);

        store.put(&record).unwrap();
        assert_eq!(store.get("euler-identity").unwrap(), Some(record.clone()));
        assert_eq!(store.len(), 1);

        // put replaces, keys stay unique
        let mut changed = record.clone();
        changed.interval = 4;
        store.put(&changed).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("euler-identity").unwrap().unwrap().interval, 4);

        assert!(store.delete("euler-identity").unwrap());
        assert!(!store.delete("euler-identity").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_review_creates_missing_record() {
        let mut store = MemoryStore::new();
        let updated = record_review(&mut store, "product-rule", q(5), 1000).unwrap();

        assert_eq!(updated.total_reviews, 1);
        assert_eq!(updated.interval, 1);
        assert_eq!(store.get("product-rule").unwrap(), Some(updated));
    }

    #[test]
    fn test_record_review_advances_existing_record() {
        let mut store = MemoryStore::new();
        record_review(&mut store, "product-rule", q(5), 0).unwrap();
        let second = record_review(&mut store, "product-rule", q(5), DAY_MS).unwrap();

        assert_eq!(second.repetitions, 2);
        assert_eq!(second.interval, 6);
        assert_eq!(second.total_reviews, 2);
    }

    #[test]
    fn test_delete_record_reports_missing_item() {
        let mut store = MemoryStore::new();
        ensure_record(&mut store, "green-theorem", 0).unwrap();

        delete_record(&mut store, "green-theorem").unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            delete_record(&mut store, "green-theorem"),
            Err(ReviewError::RecordNotFound(ref id)) if id == "green-theorem"
        ));
    }

    #[test]
    fn test_replace_all_swaps_contents() {
        let mut store = MemoryStore::new();
        ensure_record(&mut store, "old", 0).unwrap();

        store
            .replace_all(&[create_record("a", 0), create_record("b", 0)])
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("old").unwrap(), None);
    }

    #[test]
    fn test_unknown_item_is_new_and_due() {
        let store = MemoryStore::new();
        assert_eq!(item_status(&store, "missing", 0).unwrap(), StatusView::unseen());
        assert!(item_is_due(&store, "missing", 0).unwrap());
    }

    #[test]
    fn test_ensure_record_is_idempotent() {
        let mut store = MemoryStore::new();
        let first = ensure_record(&mut store, "l-hopital", 10).unwrap();
        let second = ensure_record(&mut store, "l-hopital", 99).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.next_review_time, 10);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_due_items_in_priority_order() {
        let mut store = MemoryStore::new();
        ensure_record(&mut store, "old", 0).unwrap();
        ensure_record(&mut store, "newer", 500).unwrap();
        record_review(&mut store, "reviewed", q(5), 0).unwrap();

        let due: Vec<_> = due_items(&store, 1000)
            .unwrap()
            .into_iter()
            .map(|r| r.item_id)
            .collect();
        assert_eq!(due, vec!["old", "newer"]);

        assert_eq!(
            item_status(&store, "reviewed", 1000).unwrap().state,
            ReviewState::Learning
        );
        assert!(!item_is_due(&store, "reviewed", 1000).unwrap());
    }
}
