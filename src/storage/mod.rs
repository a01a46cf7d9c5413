//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Run tracking with the final run summary
//! - Accepted item records, stored as JSON alongside their key columns

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents a crawl run
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub accepted_count: u64,
    pub pages_processed: u64,
    pub runtime_seconds: Option<f64>,
    pub success: Option<bool>,
    pub timeout_reached: bool,
    pub message: Option<String>,
}

impl RunRecord {
    /// Status derived from the stored outcome
    pub fn status(&self) -> RunStatus {
        match (self.finished_at.is_some(), self.success) {
            (false, _) => RunStatus::Running,
            (true, Some(true)) => RunStatus::Completed,
            (true, _) => RunStatus::Failed,
        }
    }
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Represents an accepted item row
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub id: i64,
    pub run_id: i64,
    pub item_id: Option<String>,
    pub url: String,
    pub title: String,
    pub price: Option<String>,
    pub sale: bool,
    pub scraped_at: String,
    pub record_json: String,
}
