pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use error::{Result, ReviewError};
pub use models::{
    Quality, ReviewRecord, ReviewSession, ReviewState, StatusView, advance, create_record,
    due_count, is_due, map_user_signal_to_quality, prioritize, status,
};
