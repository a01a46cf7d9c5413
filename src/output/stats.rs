//! Statistics generation from the catalog database
//!
//! This module provides functionality for extracting and displaying
//! run history and item counts from the storage layer.

use crate::storage::{RunRecord, Storage, StorageResult};

/// Catalog statistics summary
#[derive(Debug, Clone)]
pub struct CatalogStatistics {
    /// All runs, most recent first, with their item counts
    pub runs: Vec<(RunRecord, u64)>,

    /// Total number of stored items across all runs
    pub total_items: u64,
}

impl CatalogStatistics {
    /// Number of runs that accepted at least one record
    pub fn successful_runs(&self) -> usize {
        self.runs
            .iter()
            .filter(|(run, _)| run.success == Some(true))
            .count()
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CatalogStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<CatalogStatistics> {
    let runs = storage
        .list_runs()?
        .into_iter()
        .map(|run| -> StorageResult<(RunRecord, u64)> {
            let count = storage.count_items(Some(run.id))?;
            Ok((run, count))
        })
        .collect::<StorageResult<Vec<_>>>()?;

    let total_items = storage.count_items(None)?;

    Ok(CatalogStatistics { runs, total_items })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CatalogStatistics) {
    println!("=== Catalog Statistics ===\n");

    println!("Overview:");
    println!("  Runs: {}", stats.runs.len());
    println!("  Successful runs: {}", stats.successful_runs());
    println!("  Total items stored: {}", stats.total_items);
    println!();

    if stats.runs.is_empty() {
        return;
    }

    println!("Runs:");
    for (run, count) in &stats.runs {
        let runtime = run
            .runtime_seconds
            .map(|secs| format!("{:.2}s", secs))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  #{} {} [{}] items={} pages={} runtime={}{}",
            run.id,
            run.started_at,
            run.status().as_str(),
            count,
            run.pages_processed,
            runtime,
            if run.timeout_reached { " (timeout)" } else { "" }
        );
        if let Some(message) = &run.message {
            println!("      {}", message);
        }
    }
}
