//! Persistence for review records.
//!
//! The scheduling core only computes new records; everything here decides where
//! and when they are stored.

pub mod buffer;
pub mod db;
pub mod store;

pub use buffer::WriteBuffer;
pub use db::SqliteStore;
pub use store::{
    MemoryStore, ReviewStore, delete_record, due_items, ensure_record, item_is_due, item_status,
    record_review,
};
