//! Output module for accepted records and run summaries
//!
//! This module handles:
//! - The run summary produced at the end of every run
//! - Record sinks: JSON Lines dataset, JSON summary file, SQLite
//! - Reading run history back for statistics

mod jsonl;
mod sqlite_output;
pub mod stats;
mod traits;

pub use jsonl::{JsonLinesSink, SummaryFileSink};
pub use sqlite_output::SqliteSink;
pub use stats::{load_statistics, print_statistics, CatalogStatistics};
pub use traits::{OutputError, OutputResult, RecordSink, RunSummary, EMPTY_RUN_MESSAGE};

use crate::config::OutputConfig;
use std::path::Path;

/// Opens every sink the output configuration asks for
///
/// The SQLite sink is always present; the dataset and summary files are
/// optional.
///
/// # Arguments
///
/// * `config` - The output configuration
/// * `config_hash` - Hash stored with the run
///
/// # Returns
///
/// * `Ok(Vec<Box<dyn RecordSink>>)` - The opened sinks
/// * `Err(OutputError)` - A sink could not be opened
pub fn open_sinks(
    config: &OutputConfig,
    config_hash: &str,
) -> OutputResult<Vec<Box<dyn RecordSink>>> {
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    sinks.push(Box::new(SqliteSink::open(
        Path::new(&config.database_path),
        config_hash,
    )?));

    if let Some(dataset_path) = &config.dataset_path {
        sinks.push(Box::new(JsonLinesSink::create(Path::new(dataset_path))?));
    }

    if let Some(summary_path) = &config.summary_path {
        sinks.push(Box::new(SummaryFileSink::new(summary_path)));
    }

    Ok(sinks)
}
