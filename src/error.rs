//! Error type shared by the store, backup and configuration layers.
//!
//! The scheduling core itself never fails; only the collaborators around it do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("No review record for item: {0}")]
    RecordNotFound(String),

    #[error("Invalid review record: {0}")]
    InvalidRecord(String),

    #[error("Could not determine a data directory")]
    DataDirNotFound,

    #[error("Unsupported backup version: {0}")]
    UnsupportedBackup(u32),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
