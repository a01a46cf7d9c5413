use crate::config::types::Config;
use crate::config::validation::validate_and_clamp;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded, validated and clamped configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_crawler::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max results: {}", config.limits.max_results);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses, validates and clamps a configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;
    validate_and_clamp(&mut config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is stored with every run so results can be traced back to the
/// configuration that produced them.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_config_text(&content))
}

/// Hex-encoded SHA-256 of configuration text
pub fn hash_config_text(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[search]
keyword = "puzzle"
sort-by = "Released_DESC"
only-on-sale = true

[limits]
max-results = 25
max-pages = 3
max-concurrency = 4

[http]
max-retries = 1
proxy-url = "http://127.0.0.1:8080"

[output]
database-path = "./test.db"
dataset-path = "./items.jsonl"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.search.keyword.as_deref(), Some("puzzle"));
        assert_eq!(config.search.sort_by, "Released_DESC");
        assert!(config.search.only_on_sale);
        assert!(config.search.only_released);
        assert_eq!(config.limits.max_results, 25);
        assert_eq!(config.limits.max_pages, 3);
        assert_eq!(config.limits.max_concurrency, 4);
        assert_eq!(config.limits.max_runtime_secs, 270);
        assert_eq!(config.http.max_retries, 1);
        assert_eq!(config.output.dataset_path.as_deref(), Some("./items.jsonl"));
        assert!(config.output.summary_path.is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.search.sort_by, "_ASC");
        assert_eq!(config.limits.max_results, 100);
        assert_eq!(config.limits.max_pages, 5);
        assert_eq!(config.limits.max_concurrency, 10);
        assert!(!config.search.only_on_sale);
        assert!(config.search.only_released);
    }

    #[test]
    fn test_out_of_range_limits_are_clamped() {
        let config = parse_config(
            r#"
[limits]
max-results = 99999
max-pages = 0
max-concurrency = 500
"#,
        )
        .unwrap();

        assert_eq!(config.limits.max_results, 5000);
        assert_eq!(config.limits.max_pages, 1);
        assert_eq!(config.limits.max_concurrency, 50);
    }

    #[test]
    fn test_negative_limits_are_clamped() {
        let config = parse_config(
            r#"
[limits]
max-results = -5
max-pages = -1
max-concurrency = -20
max-runtime-secs = -300
"#,
        )
        .unwrap();

        assert_eq!(config.limits.max_results, 1);
        assert_eq!(config.limits.max_pages, 1);
        assert_eq!(config.limits.max_concurrency, 1);
        assert_eq!(config.limits.max_runtime_secs, 1);
    }

    #[test]
    fn test_limits_beyond_integer_width_are_clamped() {
        let config = parse_config(
            r#"
[limits]
max-results = 10000000000
max-pages = 9223372036854775807
max-concurrency = 4294967296
max-runtime-secs = 9223372036854775807
"#,
        )
        .unwrap();

        assert_eq!(config.limits.max_results, 5000);
        assert_eq!(config.limits.max_pages, 200);
        assert_eq!(config.limits.max_concurrency, 50);
        assert_eq!(config.limits.max_runtime_secs, 86_400);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config(
            r#"
[search]
start-url = "mailto:someone@example.com"
"#,
        );
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        assert_ne!(hash_config_text("content 1"), hash_config_text("content 2"));
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("[limits]\nmax-results = 7\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.limits.max_results, 7);
        assert_eq!(hash, hash_config_text("[limits]\nmax-results = 7\n"));
    }
}
