//! State module for tracking crawl progress
//!
//! This module provides the values that describe a crawl while it runs.
//!
//! # Components
//!
//! - `RequestKind`: The two page kinds the crawler fetches (search listing, item detail)
//! - `FetchRequest`: An immutable request placed on the frontier
//! - `RunState`: Dedup set, acceptance count and counters owned by the run coordinator

mod request;
mod run_state;

// Re-export main types
pub use request::{FetchRequest, RequestKind};
pub use run_state::{RunCounters, RunState};
