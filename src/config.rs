//! Runtime configuration, read from an optional TOML file.
//!
//! ```toml
//! database_path = "/home/me/.local/share/calc-review/reviews.sqlite3"
//! log_filter = "debug"
//! backup_dir = "/home/me/backups"
//! ```
//!
//! Missing keys fall back to defaults. The loaded value is passed to whatever
//! needs it; there is no global configuration.

use crate::error::{Result, ReviewError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "calc-review";
const DATABASE_FILE: &str = "reviews.sqlite3";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path: PathBuf,
    /// `env_logger` filter, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Where backups go; defaults to the database's directory.
    pub backup_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let database_path = default_data_dir()
            .map(|dir| dir.join(DATABASE_FILE))
            .unwrap_or_else(|_| PathBuf::from(DATABASE_FILE));
        Self {
            database_path,
            log_filter: "info".to_string(),
            backup_dir: None,
        }
    }
}

/// `<data_local_dir>/calc-review`
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR))
        .ok_or(ReviewError::DataDirNotFound)
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads `path` if given, otherwise `<data_local_dir>/calc-review/config.toml`
    /// when it exists, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_data_dir() {
                Ok(dir) if dir.join("config.toml").exists() => dir.join("config.toml"),
                _ => return Ok(Self::default()),
            },
        };
        let text = fs::read_to_string(&path)?;
        Self::from_toml(&text)
    }

    pub fn backup_dir(&self) -> PathBuf {
        match &self.backup_dir {
            Some(dir) => dir.clone(),
            None => self
                .database_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}
