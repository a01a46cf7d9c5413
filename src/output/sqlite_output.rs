//! SQLite-based record sink
//!
//! This module provides a sink that records accepted items and the run
//! summary directly to the SQLite storage backend.

use crate::extract::ItemRecord;
use crate::output::traits::{OutputResult, RecordSink, RunSummary};
use crate::storage::{SqliteStorage, Storage};
use std::path::Path;

/// SQLite-based record sink
///
/// The sink opens a run when created and closes it with the run summary.
pub struct SqliteSink {
    storage: SqliteStorage,
    run_id: i64,
}

impl SqliteSink {
    /// Creates a new SQLite sink and registers a run
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend to use
    /// * `config_hash` - Hash of the configuration the run was started with
    ///
    /// # Returns
    ///
    /// A new SqliteSink bound to a freshly created run
    pub fn new(mut storage: SqliteStorage, config_hash: &str) -> OutputResult<Self> {
        let run_id = storage.create_run(config_hash)?;
        tracing::debug!("Registered run {}", run_id);
        Ok(Self { storage, run_id })
    }

    /// Opens the database at `path` and registers a run
    pub fn open(path: &Path, config_hash: &str) -> OutputResult<Self> {
        Self::new(SqliteStorage::new(path)?, config_hash)
    }

    /// The run this sink writes to
    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }
}

impl RecordSink for SqliteSink {
    fn write_record(&mut self, record: &ItemRecord) -> OutputResult<()> {
        self.storage.insert_item(self.run_id, record)?;
        Ok(())
    }

    fn write_summary(&mut self, summary: &RunSummary) -> OutputResult<()> {
        self.storage.finish_run(self.run_id, summary)?;
        Ok(())
    }
}
