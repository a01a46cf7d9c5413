//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::extract::ItemRecord;
use crate::output::RunSummary;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, StoredItem};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, accepted_count, \
     pages_processed, runtime_seconds, success, timeout_reached, message";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Loads the raw item rows of a run
    pub fn load_item_rows(&self, run_id: i64) -> StorageResult<Vec<StoredItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, item_id, url, title, price, sale, scraped_at, record_json
             FROM items WHERE run_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            Ok(StoredItem {
                id: row.get(0)?,
                run_id: row.get(1)?,
                item_id: row.get(2)?,
                url: row.get(3)?,
                title: row.get(4)?,
                price: row.get(5)?,
                sale: row.get(6)?,
                scraped_at: row.get(7)?,
                record_json: row.get(8)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        accepted_count: row.get::<_, i64>(4)? as u64,
        pages_processed: row.get::<_, i64>(5)? as u64,
        runtime_seconds: row.get(6)?,
        success: row.get(7)?,
        timeout_reached: row.get(8)?,
        message: row.get(9)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash) VALUES (?1, ?2)",
            params![now, config_hash],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(&mut self, run_id: i64, summary: &RunSummary) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET finished_at = ?1, accepted_count = ?2, pages_processed = ?3,
             runtime_seconds = ?4, success = ?5, timeout_reached = ?6, message = ?7
             WHERE id = ?8",
            params![
                now,
                summary.accepted_count as i64,
                summary.pages_processed as i64,
                summary.runtime_seconds,
                summary.success,
                summary.timeout_reached,
                summary.message,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS))?;

        stmt.query_row(params![run_id], run_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::RunNotFound(run_id),
                other => StorageError::Sqlite(other),
            })
    }

    fn list_runs(&self) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM runs ORDER BY id DESC", RUN_COLUMNS))?;

        let runs = stmt.query_map([], run_from_row)?;
        Ok(runs.collect::<Result<Vec<_>, _>>()?)
    }

    // ===== Item Management =====

    fn insert_item(&mut self, run_id: i64, record: &ItemRecord) -> StorageResult<i64> {
        let record_json = serde_json::to_string(record)?;
        self.conn.execute(
            "INSERT INTO items (run_id, item_id, url, title, price, sale, scraped_at, record_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                run_id,
                record.item_id,
                record.url,
                record.title,
                record.price,
                record.sale,
                record.scraped_at.to_rfc3339(),
                record_json
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn count_items(&self, run_id: Option<i64>) -> StorageResult<u64> {
        let count: i64 = match run_id {
            Some(run_id) => self.conn.query_row(
                "SELECT COUNT(*) FROM items WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?,
        };
        Ok(count as u64)
    }

    fn load_items(&self, run_id: i64) -> StorageResult<Vec<ItemRecord>> {
        self.load_item_rows(run_id)?
            .iter()
            .map(|row| serde_json::from_str(&row.record_json).map_err(StorageError::from))
            .collect()
    }
}
