//! Frontier of pending page requests
//!
//! This module handles:
//! - The FIFO queue of SEARCH and ITEM requests
//! - Item deduplication through the run's seen set
//! - Search pagination bounded by the page ceiling
//! - Stopping discovery once the result ceiling is reached

use crate::state::{FetchRequest, RequestKind, RunState};
use crate::url::search_page_url;
use std::collections::VecDeque;
use url::Url;

/// Frontier manages the queue of requests still to be fetched
///
/// The frontier is seeded with exactly one SEARCH request for page 1. Every later
/// search page is derived from the original search URL, never from the URL of the
/// page that was just processed.
pub struct Frontier {
    /// Queue of requests in discovery order
    queue: VecDeque<FetchRequest>,

    /// The seed search URL
    search_url: Url,

    /// Highest search page that may be requested
    max_pages: u32,

    /// Result ceiling
    max_results: usize,
}

impl Frontier {
    /// Creates a frontier seeded with the first search page
    ///
    /// # Arguments
    ///
    /// * `search_url` - The seed search URL
    /// * `max_pages` - Highest search page that may be requested
    /// * `max_results` - Number of accepted records after which discovery stops
    pub fn new(search_url: Url, max_pages: u32, max_results: usize) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(FetchRequest::search(search_url.clone(), 1));

        Self {
            queue,
            search_url,
            max_pages,
            max_results,
        }
    }

    /// Handles the links discovered on a processed search page
    ///
    /// Counts the page, enqueues an ITEM request for every identifier not seen
    /// before and, while both ceilings allow it, enqueues the next search page.
    ///
    /// # Arguments
    ///
    /// * `state` - The run state; its seen set and counters are updated
    /// * `request` - The SEARCH request that produced `links`
    /// * `links` - Candidate item URLs in document order
    ///
    /// # Returns
    ///
    /// The number of requests enqueued
    pub fn on_search_page(
        &mut self,
        state: &mut RunState,
        request: &FetchRequest,
        links: Vec<Url>,
    ) -> usize {
        if request.kind() != RequestKind::Search {
            return 0;
        }

        state.counters.pages_processed += 1;
        let mut enqueued = 0;

        for link in links {
            if state.limit_reached(self.max_results) {
                break;
            }

            let candidate = FetchRequest::item(link);
            let Some(item_id) = candidate.identity() else {
                tracing::debug!("No item id in {}, skipping", candidate.url());
                continue;
            };

            if !state.mark_seen(&item_id) {
                continue;
            }

            self.queue.push_back(candidate);
            enqueued += 1;
        }

        let page = request.page().unwrap_or(1);
        if !state.limit_reached(self.max_results) && page < self.max_pages {
            let next_url = search_page_url(&self.search_url, page + 1);
            tracing::debug!("Enqueueing search page {}: {}", page + 1, next_url);
            self.queue
                .push_back(FetchRequest::search(next_url, page + 1));
            enqueued += 1;
        }

        tracing::debug!(
            "Search page {} enqueued {} requests ({} pending)",
            page,
            enqueued,
            self.queue.len()
        );

        enqueued
    }

    /// Takes the oldest pending request
    pub fn next_request(&mut self) -> Option<FetchRequest> {
        self.queue.pop_front()
    }

    /// Returns the number of pending requests
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether no request is pending
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    /// The seed search URL
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}
