//! Catalog-Crawler: a store catalog harvester
//!
//! This crate walks the paginated search results of a product catalog, discovers item
//! detail pages and turns each page's markup into a normalized [`ItemRecord`].

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Catalog-Crawler operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Run failed: {message}")]
    EmptyRun { message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Catalog-Crawler operations
pub type Result<T> = std::result::Result<T, CatalogError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract_item_record, ItemRecord};
pub use output::RunSummary;
pub use state::{FetchRequest, RequestKind, RunState};
