//! Output sink traits and types
//!
//! This module defines the trait interface for record sinks and the run
//! summary every sink receives at the end of a run.

use crate::extract::ItemRecord;
use crate::state::RunState;
use crate::storage::StorageError;
use crate::CatalogError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message attached to a run that accepted no records
pub const EMPTY_RUN_MESSAGE: &str =
    "No items scraped. Check your search parameters or try a different query.";

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub accepted_count: u64,
    pub pages_processed: u64,
    pub runtime_seconds: f64,
    pub success: bool,
    pub timeout_reached: bool,

    /// Item pages that reached the record stage
    pub processed: u64,

    /// Fetch and page-level failures
    pub errors: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RunSummary {
    /// Builds the summary from the final run state
    ///
    /// A run is successful when it accepted at least one record.
    pub fn from_state(state: &RunState) -> Self {
        let success = state.accepted > 0;
        Self {
            accepted_count: state.accepted as u64,
            pages_processed: state.counters.pages_processed,
            runtime_seconds: state.elapsed().as_secs_f64(),
            success,
            timeout_reached: state.timeout_reached,
            processed: state.counters.processed,
            errors: state.counters.errors,
            message: (!success).then(|| EMPTY_RUN_MESSAGE.to_string()),
        }
    }

    /// Converts a failed summary into an error
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - The run accepted at least one record
    /// * `Err(CatalogError::EmptyRun)` - The run accepted nothing
    pub fn into_result(self) -> Result<RunSummary, CatalogError> {
        if self.success {
            Ok(self)
        } else {
            Err(CatalogError::EmptyRun {
                message: self
                    .message
                    .unwrap_or_else(|| EMPTY_RUN_MESSAGE.to_string()),
            })
        }
    }
}

/// Trait for record sinks
///
/// A sink receives every accepted record in acceptance order, followed by
/// exactly one run summary.
pub trait RecordSink: Send {
    /// Writes one accepted record
    fn write_record(&mut self, record: &ItemRecord) -> OutputResult<()>;

    /// Writes the run summary; called once when the run ends
    fn write_summary(&mut self, summary: &RunSummary) -> OutputResult<()>;
}
