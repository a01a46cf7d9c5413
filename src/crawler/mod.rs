//! Crawler module for catalog page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Search page parsing and item link extraction
//! - The request frontier with deduplication and ceilings
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{rejection_reason, Coordinator, PageOutcome};
pub use fetcher::{build_http_client, FetchOutcome, HttpFetcher};
pub use frontier::Frontier;
pub use parser::extract_item_links;

use crate::config::Config;
use crate::output::RunSummary;
use crate::CatalogError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the configured sinks and register the run
/// 2. Build the HTTP client
/// 3. Seed the frontier with the first search page
/// 4. Fetch search pages and follow their item links
/// 5. Write accepted records and the run summary
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, stored with the run
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run finished; check `success` for the outcome
/// * `Err(CatalogError)` - The run could not be started or a sink failed
///
/// # Example
///
/// ```no_run
/// use catalog_crawler::config::load_config_with_hash;
/// use catalog_crawler::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let summary = crawl(config, &hash).await?;
/// println!("{} items", summary.accepted_count);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, config_hash: &str) -> Result<RunSummary, CatalogError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
