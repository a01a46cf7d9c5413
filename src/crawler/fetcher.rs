//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with browser-like headers and an optional proxy
//! - GET requests to fetch page content
//! - Retry logic for transient failures
//! - Error classification

use crate::config::HttpConfig;
use crate::{CatalogError, ConfigError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, Proxy, StatusCode};
use std::time::Duration;
use url::Url;

/// Accept header sent with every request
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Describes a failed outcome for logging
    pub fn error_message(&self) -> Option<String> {
        match self {
            FetchOutcome::Success { .. } => None,
            FetchOutcome::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            FetchOutcome::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch engine configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(CatalogError)` - A header value or the proxy was rejected
pub fn build_http_client(config: &HttpConfig) -> Result<Client, CatalogError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, header_value("accept-language", &config.accept_language)?);
    if !config.cookie.is_empty() {
        headers.insert(COOKIE, header_value("cookie", &config.cookie)?);
    }

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy_url) = &config.proxy_url {
        builder = builder.proxy(Proxy::all(proxy_url.as_str())?);
    }

    Ok(builder.build()?)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value)
        .map_err(|e| ConfigError::Validation(format!("Invalid {} header: {}", name, e)))
}

/// A single attempt either settles the outcome or may be retried
enum Attempt {
    Done(FetchOutcome),
    Retryable(FetchOutcome),
}

/// Fetch engine wrapping the HTTP client and its retry policy
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | HTTP 4xx | Immediate → HttpError |
/// | HTTP 5xx | Retry up to `max-retries` times |
/// | Timeout | Retry up to `max-retries` times |
/// | Other network error | Immediate → NetworkError |
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher from the fetch engine configuration
    pub fn new(config: &HttpConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            client: build_http_client(config)?,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Fetches a URL with retry on transient failures
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    ///
    /// A FetchOutcome indicating success or the type of failure
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let mut attempt = 0;

        loop {
            match self.fetch_once(url).await {
                Attempt::Done(outcome) => return outcome,
                Attempt::Retryable(outcome) => {
                    if attempt >= self.max_retries {
                        return outcome;
                    }
                    attempt += 1;
                    tracing::debug!(
                        "Retrying {} ({}/{}) after {:?}",
                        url,
                        attempt,
                        self.max_retries,
                        outcome.error_message().unwrap_or_default()
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_network_error(e),
        };

        let status = response.status();
        let final_url = response.url().clone();

        if status.is_server_error() {
            return Attempt::Retryable(FetchOutcome::HttpError {
                status_code: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Attempt::Done(FetchOutcome::HttpError {
                status_code: status.as_u16(),
            });
        }

        match response.text().await {
            Ok(body) => Attempt::Done(FetchOutcome::Success {
                final_url,
                status_code: status.as_u16(),
                body,
            }),
            Err(e) => classify_network_error(e),
        }
    }
}

fn classify_network_error(e: reqwest::Error) -> Attempt {
    if e.is_timeout() {
        Attempt::Retryable(FetchOutcome::NetworkError {
            error: "Request timeout".to_string(),
        })
    } else if e.is_connect() {
        Attempt::Done(FetchOutcome::NetworkError {
            error: "Connection refused".to_string(),
        })
    } else if let Some(status) = e.status().filter(StatusCode::is_server_error) {
        Attempt::Retryable(FetchOutcome::HttpError {
            status_code: status.as_u16(),
        })
    } else {
        Attempt::Done(FetchOutcome::NetworkError {
            error: e.to_string(),
        })
    }
}
