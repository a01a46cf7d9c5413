//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from the search configuration
//! - Dispatching page handlers onto a bounded worker pool
//! - Applying handler outcomes to the run state (the only writer)
//! - Enforcing the result ceiling and the wall-clock budget
//! - Writing accepted records and the final summary to the sinks

use crate::config::{Config, SearchConfig};
use crate::crawler::fetcher::{FetchOutcome, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_item_links;
use crate::extract::{extract_item_record, ExtractError, ItemRecord};
use crate::output::{open_sinks, RecordSink, RunSummary};
use crate::state::{FetchRequest, RequestKind, RunState};
use crate::url::build_search_url;
use crate::CatalogError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Accepted records between two progress lines
const PROGRESS_INTERVAL: usize = 10;

/// What a page handler hands back to the coordinator
#[derive(Debug)]
pub enum PageOutcome {
    /// A search page was parsed into candidate item links
    Search {
        request: FetchRequest,
        links: Vec<Url>,
    },

    /// An item page was extracted; `None` when the page had no title
    Item {
        request: FetchRequest,
        record: Option<ItemRecord>,
    },

    /// An item page fetched after the result ceiling was reached
    ItemSkipped { request: FetchRequest },

    /// The fetch engine gave up on the request
    FetchFailed { request: FetchRequest, error: String },

    /// The page was fetched but could not be processed
    PageFailed {
        request: FetchRequest,
        error: ExtractError,
    },

    /// The handler observed the cancellation token
    Cancelled { request: FetchRequest },
}

/// Main crawler coordinator structure
///
/// The coordinator owns the run state and the frontier. Page handlers run
/// concurrently but only return [`PageOutcome`] values; every state change
/// happens here, one outcome at a time.
pub struct Coordinator {
    config: Config,
    fetcher: HttpFetcher,
    frontier: Frontier,
    state: RunState,
    sinks: Vec<Box<dyn RecordSink>>,
    cancel: CancellationToken,
    ceiling_reached: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a new coordinator instance writing to the configured outputs
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `config_hash` - Hash of the configuration file, stored with the run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CatalogError)` - The seed URL, HTTP client or a sink could not be built
    pub fn new(config: Config, config_hash: &str) -> Result<Self, CatalogError> {
        let sinks = open_sinks(&config.output, config_hash)?;
        Self::with_sinks(config, sinks)
    }

    /// Creates a coordinator writing to the given sinks
    pub fn with_sinks(
        config: Config,
        sinks: Vec<Box<dyn RecordSink>>,
    ) -> Result<Self, CatalogError> {
        let search_url = build_search_url(&config.search)?;
        let fetcher = HttpFetcher::new(&config.http)?;
        let frontier = Frontier::new(
            search_url,
            config.limits.max_pages,
            config.limits.max_results as usize,
        );

        Ok(Self {
            config,
            fetcher,
            frontier,
            state: RunState::new(),
            sinks,
            cancel: CancellationToken::new(),
            ceiling_reached: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The run state so far
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// The seed search URL
    pub fn search_url(&self) -> &Url {
        self.frontier.search_url()
    }

    /// Token that stops the run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the main crawl loop
    ///
    /// The loop:
    /// 1. Checks the wall-clock budget
    /// 2. Dispatches pending requests up to the concurrency limit
    /// 3. Waits for the next handler outcome (or the deadline)
    /// 4. Applies the outcome to the run state and frontier
    ///
    /// It ends when the frontier is exhausted and nothing is in flight.
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - The run finished; `success` is false when nothing was accepted
    /// * `Err(CatalogError)` - A sink failed
    pub async fn run(&mut self) -> Result<RunSummary, CatalogError> {
        let limits = &self.config.limits;
        tracing::info!(
            "Configuration: maxResults={}, maxPages={}, maxConcurrency={}",
            limits.max_results,
            limits.max_pages,
            limits.max_concurrency
        );
        if let Some(keyword) = &self.config.search.keyword {
            tracing::info!("Keyword: {}", keyword);
        }
        tracing::info!("Starting crawl at {}", self.frontier.search_url());

        let budget = Duration::from_secs(self.config.limits.max_runtime_secs);
        let deadline = tokio::time::Instant::from_std(self.state.started_at) + budget;
        let mut tasks: JoinSet<PageOutcome> = JoinSet::new();

        loop {
            self.check_deadline(budget);

            if !self.cancel.is_cancelled() {
                self.dispatch(&mut tasks);
            }

            if tasks.is_empty() {
                if self.frontier.is_exhausted() {
                    tracing::debug!("Frontier is empty, crawl complete");
                }
                break;
            }

            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok(outcome)) => {
                        self.check_deadline(budget);
                        if self.state.timeout_reached {
                            tracing::debug!(
                                "Discarding outcome after timeout: {}",
                                outcome_request(&outcome).url()
                            );
                        } else {
                            self.handle_outcome(outcome)?;
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!("Page handler failed: {}", e);
                        self.state.record_error();
                    }
                    None => break,
                },
                _ = tokio::time::sleep_until(deadline), if !self.state.timeout_reached => {
                    self.check_deadline(budget);
                }
            }
        }

        self.finish()
    }

    /// Moves pending requests onto the worker pool
    fn dispatch(&mut self, tasks: &mut JoinSet<PageOutcome>) {
        let max_concurrency = self.config.limits.max_concurrency as usize;

        while tasks.len() < max_concurrency {
            let Some(request) = self.frontier.next_request() else {
                break;
            };

            if request.kind() == RequestKind::Item && self.limit_reached() {
                self.state.counters.processed += 1;
                tracing::debug!("Result ceiling reached, skipping {}", request.url());
                continue;
            }

            tracing::debug!("Dispatching {}", request);
            tasks.spawn(handle_page(
                self.fetcher.clone(),
                request,
                self.cancel.clone(),
                Arc::clone(&self.ceiling_reached),
            ));
        }
    }

    /// Applies one handler outcome to the run state
    fn handle_outcome(&mut self, outcome: PageOutcome) -> Result<(), CatalogError> {
        match outcome {
            PageOutcome::Search { request, links } => {
                tracing::info!(
                    "Page {}: Found {} item links",
                    request.page().unwrap_or(1),
                    links.len()
                );
                self.frontier
                    .on_search_page(&mut self.state, &request, links);
            }

            PageOutcome::Item { request, record } => {
                self.state.counters.processed += 1;

                if self.limit_reached() {
                    tracing::debug!("Result ceiling reached, dropping {}", request.url());
                    return Ok(());
                }

                let Some(record) = record else {
                    tracing::debug!("No record extracted from {}", request.url());
                    return Ok(());
                };

                if let Some(reason) = rejection_reason(&self.config.search, &record) {
                    tracing::debug!("Skipping {}: {}", record.url, reason);
                    return Ok(());
                }

                self.accept(record)?;
            }

            PageOutcome::ItemSkipped { request } => {
                self.state.counters.processed += 1;
                tracing::debug!("Result ceiling reached, skipped {}", request.url());
            }

            PageOutcome::FetchFailed { request, error } => {
                self.on_fetch_error(request.url(), &error);
            }

            PageOutcome::PageFailed { request, error } => {
                if request.kind() == RequestKind::Item {
                    self.state.counters.processed += 1;
                }
                self.state.record_error();
                tracing::warn!("Error processing {}: {}", request.url(), error);
            }

            PageOutcome::Cancelled { request } => {
                tracing::debug!("Cancelled before processing {}", request.url());
            }
        }

        Ok(())
    }

    /// Records an accepted record and writes it to every sink
    fn accept(&mut self, record: ItemRecord) -> Result<(), CatalogError> {
        for sink in self.sinks.iter_mut() {
            sink.write_record(&record)?;
        }

        self.state.record_accepted();
        let accepted = self.state.accepted;
        let max_results = self.config.limits.max_results;

        if accepted == 1 {
            tracing::info!("First item saved: {}", record.title);
        }

        if accepted % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {}/{} items | {:.1}s | {:.2} items/sec",
                accepted,
                max_results,
                self.state.elapsed().as_secs_f64(),
                self.state.throughput()
            );
        }

        if self.limit_reached() {
            self.ceiling_reached.store(true, Ordering::Release);
            tracing::info!("Result ceiling of {} reached", max_results);
        }

        Ok(())
    }

    /// Counts a failed fetch; the request is not retried
    pub fn on_fetch_error(&mut self, url: &Url, error: &str) {
        self.state.record_error();
        tracing::warn!("Error on {}: {}", url, error);
    }

    fn limit_reached(&self) -> bool {
        self.state
            .limit_reached(self.config.limits.max_results as usize)
    }

    /// Cancels the run once the wall-clock budget is spent
    fn check_deadline(&mut self, budget: Duration) {
        if self.state.timeout_reached || self.state.elapsed() < budget {
            return;
        }

        self.state.timeout_reached = true;
        self.cancel.cancel();
        tracing::info!(
            "Timeout safety triggered at {:.0}s",
            self.state.elapsed().as_secs_f64()
        );
    }

    /// Builds the summary, logs the final report and closes the sinks
    fn finish(&mut self) -> Result<RunSummary, CatalogError> {
        let summary = RunSummary::from_state(&self.state);
        self.log_final_report(&summary);

        for sink in self.sinks.iter_mut() {
            sink.write_summary(&summary)?;
        }

        Ok(summary)
    }

    fn log_final_report(&self, summary: &RunSummary) {
        let limits = &self.config.limits;
        let rule = "=".repeat(70);

        tracing::info!("{}", rule);
        tracing::info!("CATALOG CRAWLER - RUN STATISTICS");
        tracing::info!("{}", rule);
        tracing::info!(
            "Items scraped: {}/{}",
            summary.accepted_count,
            limits.max_results
        );
        tracing::info!(
            "Pages processed: {}/{}",
            summary.pages_processed,
            limits.max_pages
        );
        tracing::info!("Total processed: {}", summary.processed);
        tracing::info!("Errors: {}", summary.errors);
        tracing::info!("Runtime: {:.2}s", summary.runtime_seconds);
        tracing::info!("Performance: {:.2} items/second", self.state.throughput());
        if summary.timeout_reached {
            tracing::info!("Stopped early: runtime budget exhausted");
        }
        tracing::info!("{}", rule);

        match &summary.message {
            Some(message) if !summary.success => tracing::error!("{}", message),
            _ => tracing::info!(
                "SUCCESS: Scraped {} item(s)",
                summary.accepted_count
            ),
        }
    }
}

/// Returns why a record is filtered out, or `None` when it is kept
pub fn rejection_reason(search: &SearchConfig, record: &ItemRecord) -> Option<&'static str> {
    if search.only_on_sale && !record.sale {
        return Some("not on sale");
    }
    if search.only_released && record.coming_soon {
        return Some("not released yet");
    }
    None
}

/// Fetches and processes one page
///
/// Runs on the worker pool. It never touches the run state: everything it
/// learns is returned as a [`PageOutcome`].
async fn handle_page(
    fetcher: HttpFetcher,
    request: FetchRequest,
    cancel: CancellationToken,
    ceiling_reached: Arc<AtomicBool>,
) -> PageOutcome {
    if cancel.is_cancelled() {
        return PageOutcome::Cancelled { request };
    }

    let url = request.url().to_string();
    let outcome = tokio::select! {
        _ = cancel.cancelled() => return PageOutcome::Cancelled { request },
        outcome = fetcher.fetch(&url) => outcome,
    };

    match outcome {
        FetchOutcome::Success {
            final_url,
            status_code,
            body,
        } => {
            tracing::debug!("Fetched {} ({})", request.url(), status_code);
            if &final_url != request.url() {
                tracing::debug!("Redirected to {}", final_url);
            }
            process_body(request, &final_url, &body, &ceiling_reached)
        }
        failed => PageOutcome::FetchFailed {
            error: failed
                .error_message()
                .unwrap_or_else(|| "unknown fetch error".to_string()),
            request,
        },
    }
}

/// Parses a fetched body according to the request kind
///
/// Relative links on a search page resolve against `final_url`, the address the
/// page was actually served from after redirects.
fn process_body(
    request: FetchRequest,
    final_url: &Url,
    body: &str,
    ceiling_reached: &AtomicBool,
) -> PageOutcome {
    match request.kind() {
        RequestKind::Search => {
            let links = extract_item_links(body, final_url);
            PageOutcome::Search { request, links }
        }
        RequestKind::Item => {
            if ceiling_reached.load(Ordering::Acquire) {
                return PageOutcome::ItemSkipped { request };
            }

            match extract_item_record(body, request.url().as_str()) {
                Ok(record) => PageOutcome::Item { request, record },
                Err(error) => PageOutcome::PageFailed { request, error },
            }
        }
    }
}

fn outcome_request(outcome: &PageOutcome) -> &FetchRequest {
    match outcome {
        PageOutcome::Search { request, .. }
        | PageOutcome::Item { request, .. }
        | PageOutcome::ItemSkipped { request }
        | PageOutcome::FetchFailed { request, .. }
        | PageOutcome::PageFailed { request, .. }
        | PageOutcome::Cancelled { request } => request,
    }
}
