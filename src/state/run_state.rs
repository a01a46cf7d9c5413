use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Per-kind counters aggregated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Item pages that reached the record stage (accepted or not)
    pub processed: u64,

    /// Records accepted and written out
    pub saved: u64,

    /// Fetch failures and page-level extraction failures
    pub errors: u64,

    /// Search pages processed
    pub pages_processed: u64,
}

/// Mutable state of a single crawl run
///
/// Owned by the run coordinator for the lifetime of the run and lent by `&mut`
/// to the frontier; extractors never see it.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Item identifiers that already produced an item request
    pub seen_items: HashSet<String>,

    /// Number of accepted records
    pub accepted: usize,

    pub counters: RunCounters,

    /// When the run started
    pub started_at: Instant,

    /// Whether the wall-clock budget was exhausted
    pub timeout_reached: bool,
}

impl RunState {
    /// Creates the state for a run starting now
    pub fn new() -> Self {
        Self {
            seen_items: HashSet::new(),
            accepted: 0,
            counters: RunCounters::default(),
            started_at: Instant::now(),
            timeout_reached: false,
        }
    }

    /// Marks an item identifier as seen
    ///
    /// Returns `true` the first time an identifier is recorded and `false` for every
    /// later attempt.
    pub fn mark_seen(&mut self, item_id: &str) -> bool {
        if self.seen_items.contains(item_id) {
            return false;
        }
        self.seen_items.insert(item_id.to_string())
    }

    /// Returns true once `limit` records have been accepted
    pub fn limit_reached(&self, limit: usize) -> bool {
        self.accepted >= limit
    }

    /// Counts one accepted record
    pub fn record_accepted(&mut self) {
        self.accepted += 1;
        self.counters.saved = self.accepted as u64;
    }

    /// Counts one fetch or page-level failure
    pub fn record_error(&mut self) {
        self.counters.errors += 1;
    }

    /// Time elapsed since the run started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Accepted records per second so far
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.accepted as f64 / secs
        } else {
            0.0
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
