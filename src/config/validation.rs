use crate::config::types::{Config, HttpConfig, LimitsConfig, OutputConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Bounds for `max-results`
pub const MAX_RESULTS_RANGE: (u32, u32) = (1, 5000);

/// Bounds for `max-pages`
pub const MAX_PAGES_RANGE: (u32, u32) = (1, 200);

/// Bounds for `max-concurrency`
pub const MAX_CONCURRENCY_RANGE: (u32, u32) = (1, 50);

/// Bounds for `max-runtime-secs`
pub const MAX_RUNTIME_RANGE: (u64, u64) = (1, 86_400);

/// Validates the configuration and clamps numeric limits into range
///
/// Numeric inputs are never rejected; only malformed URLs and empty output paths are.
pub fn validate_and_clamp(config: &mut Config) -> Result<(), ConfigError> {
    clamp_limits(&mut config.limits);
    validate_search_config(&config.search)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Clamps every run ceiling into its allowed range
pub fn clamp_limits(limits: &mut LimitsConfig) {
    limits.max_results = clamp_logged("max-results", limits.max_results, MAX_RESULTS_RANGE);
    limits.max_pages = clamp_logged("max-pages", limits.max_pages, MAX_PAGES_RANGE);
    limits.max_concurrency =
        clamp_logged("max-concurrency", limits.max_concurrency, MAX_CONCURRENCY_RANGE);
    limits.max_runtime_secs =
        clamp_logged("max-runtime-secs", limits.max_runtime_secs, MAX_RUNTIME_RANGE);
}

fn clamp_logged<T>(name: &str, value: T, (min, max): (T, T)) -> T
where
    T: Ord + Copy + std::fmt::Display,
{
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::debug!("{} = {} is out of range, clamped to {}", name, value, clamped);
    }
    clamped
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if let Some(start_url) = &config.start_url {
        validate_http_url("start-url", start_url)?;
    }
    Ok(())
}

/// Validates fetch engine configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if let Some(proxy_url) = &config.proxy_url {
        Url::parse(proxy_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy-url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.dataset_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "dataset-path cannot be empty when set".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Checks that `value` is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
