//! Catalog-Crawler main entry point
//!
//! This is the command-line interface for the Catalog-Crawler store harvester.

use anyhow::Context;
use catalog_crawler::config::{
    hash_config_text, load_config_with_hash, saturate_u32, validate_and_clamp, Config,
};
use catalog_crawler::crawler::Coordinator;
use catalog_crawler::output::{load_statistics, print_statistics};
use catalog_crawler::storage::SqliteStorage;
use catalog_crawler::url::build_search_url;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Crawler: a store catalog harvester
///
/// Catalog-Crawler walks paginated store search results, visits every item
/// detail page it discovers and writes one normalized record per item.
#[derive(Parser, Debug)]
#[command(name = "catalog-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A store catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Search term, overriding the configuration
    #[arg(long)]
    keyword: Option<String>,

    /// Explicit search URL, overriding keyword and sort order
    #[arg(long)]
    start_url: Option<String>,

    /// Maximum number of accepted records (clamped to 1-5000)
    #[arg(long, allow_negative_numbers = true)]
    max_results: Option<i64>,

    /// Keep only discounted items
    #[arg(long)]
    only_on_sale: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show where the crawl would start without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show run history from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_crawler=info,warn"),
            1 => EnvFilter::new("catalog_crawler=debug,info"),
            2 => EnvFilter::new("catalog_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<(Config, String)> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok((config, hash))
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Ok((Config::default(), hash_config_text("")))
        }
    }
}

/// Applies command-line overrides and re-validates the result
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(keyword) = &cli.keyword {
        config.search.keyword = Some(keyword.clone());
    }
    if let Some(start_url) = &cli.start_url {
        config.search.start_url = Some(start_url.clone());
    }
    if let Some(max_results) = cli.max_results {
        config.limits.max_results = saturate_u32(max_results);
    }
    if cli.only_on_sale {
        config.search.only_on_sale = true;
    }

    validate_and_clamp(config).context("Invalid command-line override")?;
    Ok(())
}

/// Handles the --dry-run mode: validates config and shows where the crawl starts
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let search_url = build_search_url(&config.search)?;

    println!("=== Catalog-Crawler Dry Run ===\n");

    println!("Search:");
    println!("  Start URL: {}", search_url);
    println!(
        "  Keyword: {}",
        config.search.keyword.as_deref().unwrap_or("-")
    );
    println!("  Sort by: {}", config.search.sort_by);
    println!("  Only on sale: {}", config.search.only_on_sale);
    println!("  Only released: {}", config.search.only_released);

    println!("\nLimits:");
    println!("  Max results: {}", config.limits.max_results);
    println!("  Max pages: {}", config.limits.max_pages);
    println!("  Max concurrency: {}", config.limits.max_concurrency);
    println!("  Max runtime: {}s", config.limits.max_runtime_secs);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!(
        "  Retries: {} ({}ms apart)",
        config.http.max_retries, config.http.retry_delay_ms
    );
    println!(
        "  Proxy: {}",
        if config.http.proxy_url.is_some() {
            "configured"
        } else {
            "none"
        }
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    if let Some(path) = &config.output.dataset_path {
        println!("  Dataset: {}", path);
    }
    if let Some(path) = &config.output.summary_path {
        println!("  Summary: {}", path);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows run history from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config, config_hash)?;

    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after in-flight pages");
            cancel.cancel();
        }
    });

    let summary = coordinator.run().await?;
    summary.into_result()?;

    Ok(())
}
