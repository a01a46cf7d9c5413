//! Configuration module for Catalog-Crawler
//!
//! This module handles loading, parsing, validating and clamping TOML configuration files.
//! Every section is optional; an empty file yields the default configuration.
//!
//! # Example
//!
//! ```no_run
//! use catalog_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will stop after {} records", config.limits.max_results);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    saturate_u32, saturate_u64, Config, HttpConfig, LimitsConfig, OutputConfig, SearchConfig,
    DEFAULT_COOKIE, DEFAULT_SORT_BY, DEFAULT_USER_AGENT,
};

// Re-export parser and validation functions
pub use parser::{
    compute_config_hash, hash_config_text, load_config, load_config_with_hash, parse_config,
};
pub use validation::{clamp_limits, validate_and_clamp};
