//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::extract::ItemRecord;
use crate::output::RunSummary;
use crate::storage::RunRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the crawler.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Records the final summary of a run and its finish timestamp
    fn finish_run(&mut self, run_id: i64, summary: &RunSummary) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Lists all runs, most recent first
    fn list_runs(&self) -> StorageResult<Vec<RunRecord>>;

    // ===== Item Management =====

    /// Stores an accepted record
    ///
    /// # Returns
    ///
    /// The row ID of the stored item
    fn insert_item(&mut self, run_id: i64, record: &ItemRecord) -> StorageResult<i64>;

    /// Counts stored items, for one run or for all runs
    fn count_items(&self, run_id: Option<i64>) -> StorageResult<u64>;

    /// Loads the records of a run in insertion order
    fn load_items(&self, run_id: i64) -> StorageResult<Vec<ItemRecord>>;
}
