//! Fetch request definitions for the crawl frontier
//!
//! This module defines the two kinds of pages the crawler fetches and the
//! immutable request value placed on the frontier.

use std::fmt;
use url::Url;

/// The kind of page a request points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// One paginated catalog listing page
    Search,

    /// One product detail page
    Item,
}

impl RequestKind {
    /// Returns the label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Search => "SEARCH",
            Self::Item => "ITEM",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A request waiting on the frontier
///
/// Requests are immutable once built; the fields are only readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: Url,
    kind: RequestKind,
    page: Option<u32>,
}

impl FetchRequest {
    /// Creates a request for search listing page `page`
    pub fn search(url: Url, page: u32) -> Self {
        Self {
            url,
            kind: RequestKind::Search,
            page: Some(page),
        }
    }

    /// Creates a request for an item detail page
    pub fn item(url: Url) -> Self {
        Self {
            url,
            kind: RequestKind::Item,
            page: None,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Listing page number; only set for search requests
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Returns the dedup identity of the request
    ///
    /// Item requests are identified by their catalog identifier and search
    /// requests by their absolute URL. An item URL without an identifier has
    /// no identity and is never enqueued.
    pub fn identity(&self) -> Option<String> {
        match self.kind {
            RequestKind::Item => crate::url::extract_item_id(self.url.as_str()),
            RequestKind::Search => Some(self.url.to_string()),
        }
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page {
            Some(page) => write!(f, "{} page {} ({})", self.kind, page, self.url),
            None => write!(f, "{} {}", self.kind, self.url),
        }
    }
}
