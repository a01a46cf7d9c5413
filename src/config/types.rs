use serde::{Deserialize, Deserializer};

/// Default search sort key (ascending relevance)
pub const DEFAULT_SORT_BY: &str = "_ASC";

/// Desktop browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Cookie that marks the visitor as old enough to skip the age gate
pub const DEFAULT_COOKIE: &str = "birthtime=0; path=/; max-age=315360000";

/// Main configuration structure for Catalog-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub limits: LimitsConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// What to search for and which records to keep
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Explicit entry point; takes precedence over `keyword` and `sort_by`
    #[serde(rename = "start-url")]
    pub start_url: Option<String>,

    /// Search term
    pub keyword: Option<String>,

    /// Sort key passed as the `sort_by` query parameter
    #[serde(rename = "sort-by")]
    pub sort_by: String,

    /// Keep only records that are currently discounted
    #[serde(rename = "only-on-sale")]
    pub only_on_sale: bool,

    /// Drop records flagged as coming soon
    #[serde(rename = "only-released")]
    pub only_released: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start_url: None,
            keyword: None,
            sort_by: DEFAULT_SORT_BY.to_string(),
            only_on_sale: false,
            only_released: true,
        }
    }
}

/// Run ceilings. Any integer is accepted; out-of-range values are clamped during validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum number of accepted records
    #[serde(rename = "max-results", deserialize_with = "saturating_u32")]
    pub max_results: u32,

    /// Highest search page that will be requested
    #[serde(rename = "max-pages", deserialize_with = "saturating_u32")]
    pub max_pages: u32,

    /// Maximum number of pages fetched in parallel
    #[serde(rename = "max-concurrency", deserialize_with = "saturating_u32")]
    pub max_concurrency: u32,

    /// Wall-clock budget for the whole run (seconds)
    #[serde(rename = "max-runtime-secs", deserialize_with = "saturating_u64")]
    pub max_runtime_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_results: 100,
            max_pages: 5,
            max_concurrency: 10,
            max_runtime_secs: 270,
        }
    }
}

/// Converts any integer into the `u32` range, saturating at both ends
///
/// Limits read from the config file or the command line go through this first and
/// are clamped into their real range afterwards, so no integer input is rejected.
pub fn saturate_u32(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Converts any integer into the `u64` range, mapping negatives to zero
pub fn saturate_u64(value: i64) -> u64 {
    value.max(0) as u64
}

fn saturating_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(saturate_u32)
}

fn saturating_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(saturate_u64)
}

/// Fetch engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Cookie header sent with every request
    pub cookie: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Retries for 5xx responses and timeouts
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Proxy passed through to the HTTP client untouched
    #[serde(rename = "proxy-url")]
    pub proxy_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            cookie: DEFAULT_COOKIE.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 5000,
            proxy_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite dataset
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Optional JSON Lines file receiving one record per line
    #[serde(rename = "dataset-path")]
    pub dataset_path: Option<String>,

    /// Optional JSON file receiving the run summary
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./catalog.db".to_string(),
            dataset_path: None,
            summary_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate_u32() {
        assert_eq!(saturate_u32(-5), 0);
        assert_eq!(saturate_u32(42), 42);
        assert_eq!(saturate_u32(10_000_000_000), u32::MAX);
    }

    #[test]
    fn test_saturate_u64() {
        assert_eq!(saturate_u64(i64::MIN), 0);
        assert_eq!(saturate_u64(270), 270);
    }
}
