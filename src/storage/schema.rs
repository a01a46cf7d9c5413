//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Catalog-Crawler database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs and their final summary
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    accepted_count INTEGER NOT NULL DEFAULT 0,
    pages_processed INTEGER NOT NULL DEFAULT 0,
    runtime_seconds REAL,
    success INTEGER,
    timeout_reached INTEGER NOT NULL DEFAULT 0,
    message TEXT
);

-- Accepted item records
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    item_id TEXT,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    price TEXT,
    sale INTEGER NOT NULL DEFAULT 0,
    scraped_at TEXT NOT NULL,
    record_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_run ON items(run_id);
CREATE INDEX IF NOT EXISTS idx_items_item_id ON items(item_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
