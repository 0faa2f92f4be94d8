//! Write-behind buffer in front of a review store.
//!
//! Writes land in memory and mark the buffer dirty; nothing reaches the backing
//! store until `flush` is called or the buffer is dropped.

use super::store::ReviewStore;
use crate::error::Result;
use crate::models::ReviewRecord;
use std::collections::HashMap;

pub struct WriteBuffer<S: ReviewStore> {
    inner: S,
    /// `None` marks a pending delete.
    pending: HashMap<String, Option<ReviewRecord>>,
    cleared: bool,
}

impl<S: ReviewStore> WriteBuffer<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: HashMap::new(),
            cleared: false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.cleared || !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The backing store, without pending changes.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Writes all pending changes through to the backing store.
    pub fn flush(&mut self) -> Result<()> {
        if !self.is_dirty() {
            return Ok(());
        }
        if self.cleared {
            self.inner.clear()?;
            self.cleared = false;
        }

        // Pending changes are kept until every write succeeded
        let count = self.pending.len();
        for (item_id, change) in &self.pending {
            match change {
                Some(record) => self.inner.put(record)?,
                None => {
                    self.inner.delete(item_id)?;
                }
            }
        }
        self.pending.clear();
        log::info!("flushed {} pending review change(s)", count);
        Ok(())
    }
}

impl<S: ReviewStore> ReviewStore for WriteBuffer<S> {
    fn get(&self, item_id: &str) -> Result<Option<ReviewRecord>> {
        match self.pending.get(item_id) {
            Some(change) => Ok(change.clone()),
            None if self.cleared => Ok(None),
            None => self.inner.get(item_id),
        }
    }

    fn put(&mut self, record: &ReviewRecord) -> Result<()> {
        self.pending
            .insert(record.item_id.clone(), Some(record.clone()));
        Ok(())
    }

    fn list(&self) -> Result<Vec<ReviewRecord>> {
        let mut records: HashMap<String, ReviewRecord> = if self.cleared {
            HashMap::new()
        } else {
            self.inner
                .list()?
                .into_iter()
                .map(|r| (r.item_id.clone(), r))
                .collect()
        };
        for (item_id, change) in &self.pending {
            match change {
                Some(record) => {
                    records.insert(item_id.clone(), record.clone());
                }
                None => {
                    records.remove(item_id);
                }
            }
        }
        Ok(records.into_values().collect())
    }

    fn delete(&mut self, item_id: &str) -> Result<bool> {
        let existed = self.get(item_id)?.is_some();
        if existed {
            self.pending.insert(item_id.to_string(), None);
        }
        Ok(existed)
    }

    fn clear(&mut self) -> Result<()> {
        self.pending.clear();
        self.cleared = true;
        Ok(())
    }
}

impl<S: ReviewStore> Drop for WriteBuffer<S> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("failed to flush review records on shutdown: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryStore, SqliteStore, store};
    use crate::models::{Quality, create_record};
    use tempfile::tempdir;

    #[test]
    fn test_writes_are_deferred_until_flush() {
        let mut buffer = WriteBuffer::new(MemoryStore::new());
        assert!(!buffer.is_dirty());

        store::record_review(&mut buffer, "squeeze-theorem", Quality::clamped(5), 0).unwrap();
        store::record_review(&mut buffer, "squeeze-theorem", Quality::clamped(4), 10).unwrap();
        assert!(buffer.is_dirty());
        assert_eq!(buffer.pending_count(), 1);
        assert!(buffer.get("squeeze-theorem").unwrap().is_some());
        assert!(buffer.inner().is_empty());

        buffer.flush().unwrap();
        assert!(!buffer.is_dirty());
        assert_eq!(buffer.pending_count(), 0);
        assert_eq!(buffer.inner().len(), 1);
    }

    #[test]
    fn test_pending_delete_hides_record() {
        let mut backing = MemoryStore::new();
        backing.put(&create_record("a", 0)).unwrap();
        backing.put(&create_record("b", 0)).unwrap();

        let mut buffer = WriteBuffer::new(backing);
        assert!(buffer.delete("a").unwrap());
        assert!(!buffer.delete("missing").unwrap());
        assert_eq!(buffer.get("a").unwrap(), None);
        assert_eq!(buffer.list().unwrap().len(), 1);
        assert_eq!(buffer.inner().len(), 2);

        buffer.flush().unwrap();
        assert_eq!(buffer.inner().len(), 1);
    }

    #[test]
    fn test_clear_then_put() {
        let mut backing = MemoryStore::new();
        backing.put(&create_record("old", 0)).unwrap();

        let mut buffer = WriteBuffer::new(backing);
        buffer.clear().unwrap();
        buffer.put(&create_record("new", 0)).unwrap();

        let ids: Vec<_> = buffer.list().unwrap().into_iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec!["new"]);
        assert_eq!(buffer.get("old").unwrap(), None);

        buffer.flush().unwrap();
        assert_eq!(buffer.inner().get("old").unwrap(), None);
        assert!(buffer.inner().get("new").unwrap().is_some());
    }

    #[test]
    fn test_drop_flushes_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reviews.sqlite3");

        {
            let mut buffer = WriteBuffer::new(SqliteStore::open(&path).unwrap());
            store::record_review(&mut buffer, "ratio-test", Quality::clamped(4), 0).unwrap();
        }

        let db = SqliteStore::open(&path).unwrap();
        assert_eq!(db.get("ratio-test").unwrap().unwrap().total_reviews, 1);
    }
}
