//! Integration tests for the crawler
//!
//! These tests use wiremock to create a mock store and test the full crawl
//! cycle end-to-end: search pages, item pages, sinks and the run summary.

use catalog_crawler::config::Config;
use catalog_crawler::crawler::Coordinator;
use catalog_crawler::storage::{RunStatus, SqliteStorage, Storage};
use catalog_crawler::CatalogError;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration starting at `start_url` with outputs in `dir`
fn create_test_config(start_url: String, dir: &Path) -> Config {
    let mut config = Config::default();
    config.search.start_url = Some(start_url);
    config.limits.max_pages = 1;
    config.http.max_retries = 0;
    config.http.retry_delay_ms = 0;
    config.http.timeout_secs = 10;
    config.output.database_path = dir.join("catalog.db").to_string_lossy().into_owned();
    config.output.dataset_path = Some(dir.join("items.jsonl").to_string_lossy().into_owned());
    config.output.summary_path = Some(dir.join("summary.json").to_string_lossy().into_owned());
    config
}

/// Builds a search results page linking to `hrefs`
fn search_page(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a class="search_result_row" href="{}">Result</a>"#, href))
        .collect();
    format!(
        r#"<html><body><div id="search_resultsRows">{}</div></body></html>"#,
        links
    )
}

/// Builds an item detail page
fn item_page(title: &str, sale: bool, coming_soon: bool) -> String {
    let purchase = if sale {
        r#"<div class="discount_pct">-50%</div><div class="discount_final_price">$4.99</div>"#
    } else {
        r#"<div class="game_purchase_price price">$9.99</div>"#
    };
    let coming_soon = if coming_soon {
        r#"<div class="game_area_comingsoon">Coming soon</div>"#
    } else {
        ""
    };
    format!(
        r#"<html><body>
        <div id="appHubAppName">{}</div>
        <div class="game_description_snippet">A test item.</div>
        {}
        <div class="game_area_purchase_game">
          <div class="game_area_purchase_platform"><span class="platform_img win"></span></div>
          {}
        </div>
        </body></html>"#,
        title, coming_soon, purchase
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_item_once(server: &MockServer, id: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/app/{}/", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn open_storage(config: &Config) -> SqliteStorage {
    SqliteStorage::new(Path::new(&config.output.database_path)).expect("Failed to open DB")
}

#[tokio::test]
async fn test_full_crawl_with_pagination_and_dedup() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Page 2 is requested with the original query plus page=2
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("term", "puzzle"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(search_page(&["/app/3/", "/app/4/"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&[
            "/app/1/First/?snr=1_7_7",
            "/app/2/",
            "/app/1/",
            "/bundle/99/",
            "/app/3/#reviews",
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Every item is fetched exactly once despite duplicate links
    for id in 1..=4 {
        mount_item_once(&mock_server, id, item_page(&format!("Item {}", id), false, false)).await;
    }

    let mut config = create_test_config(
        format!("{}/search/?term=puzzle", mock_server.uri()),
        dir.path(),
    );
    config.limits.max_pages = 2;

    let mut coordinator =
        Coordinator::new(config.clone(), "test-hash").expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert!(summary.success);
    assert_eq!(summary.accepted_count, 4);
    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.errors, 0);
    assert!(!summary.timeout_reached);

    // SQLite sink
    let storage = open_storage(&config);
    let runs = storage.list_runs().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].config_hash, "test-hash");
    assert_eq!(runs[0].status(), RunStatus::Completed);
    assert_eq!(runs[0].accepted_count, 4);

    let mut ids: Vec<String> = storage
        .load_items(runs[0].id)
        .unwrap()
        .into_iter()
        .filter_map(|record| record.item_id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);

    // JSON Lines sink
    let dataset = std::fs::read_to_string(dir.path().join("items.jsonl")).unwrap();
    assert_eq!(dataset.lines().count(), 4);
    let first: serde_json::Value = serde_json::from_str(dataset.lines().next().unwrap()).unwrap();
    assert_eq!(first["price"], "$9.99");
    assert_eq!(first["supportedPlatforms"], serde_json::json!(["windows"]));

    // Summary file
    let written: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("summary.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(written["acceptedCount"], 4);
    assert_eq!(written["success"], true);
}

#[tokio::test]
async fn test_result_ceiling_is_exact() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let links: Vec<String> = (1..=8).map(|id| format!("/app/{}/", id)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/search/", search_page(&link_refs)).await;

    for id in 1..=8 {
        mount_page(
            &mock_server,
            &format!("/app/{}/", id),
            item_page(&format!("Item {}", id), false, false),
        )
        .await;
    }

    let mut config = create_test_config(format!("{}/search/", mock_server.uri()), dir.path());
    config.limits.max_results = 3;
    config.limits.max_concurrency = 10;

    let mut coordinator = Coordinator::new(config.clone(), "hash").unwrap();
    let summary = coordinator.run().await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.accepted_count, 3);

    let storage = open_storage(&config);
    assert_eq!(storage.count_items(None).unwrap(), 3);

    let dataset = std::fs::read_to_string(dir.path().join("items.jsonl")).unwrap();
    assert_eq!(dataset.lines().count(), 3);
}

#[tokio::test]
async fn test_items_dequeued_after_ceiling_are_not_fetched() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/search/",
        search_page(&["/app/1/", "/app/2/", "/app/3/"]),
    )
    .await;
    mount_item_once(&mock_server, 1, item_page("First", false, false)).await;
    for id in 2..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/app/{}/", id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(item_page("Late", false, false)),
            )
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(format!("{}/search/", mock_server.uri()), dir.path());
    config.limits.max_results = 1;
    config.limits.max_concurrency = 1;

    let mut coordinator = Coordinator::new(config, "hash").unwrap();
    let summary = coordinator.run().await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.accepted_count, 1);
    // The two skipped items still count as processed
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.errors, 0);
}

#[tokio::test]
async fn test_links_resolve_against_redirected_search_page() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/catalog/results/"),
        )
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/catalog/results/",
        search_page(&["../app/7/"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/catalog/app/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(item_page("Moved", false, false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/search/", mock_server.uri()), dir.path());
    let mut coordinator = Coordinator::new(config, "hash").unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.accepted_count, 1);
    assert_eq!(summary.errors, 0);
}

#[tokio::test]
async fn test_sale_and_release_filters() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/search/",
        search_page(&["/app/1/", "/app/2/", "/app/3/"]),
    )
    .await;
    mount_page(&mock_server, "/app/1/", item_page("On Sale", true, false)).await;
    mount_page(&mock_server, "/app/2/", item_page("Full Price", false, false)).await;
    mount_page(&mock_server, "/app/3/", item_page("Upcoming Sale", true, true)).await;

    let mut config = create_test_config(format!("{}/search/", mock_server.uri()), dir.path());
    config.search.only_on_sale = true;
    config.search.only_released = true;

    let mut coordinator = Coordinator::new(config.clone(), "hash").unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.accepted_count, 1);
    assert_eq!(summary.processed, 3);

    let storage = open_storage(&config);
    let runs = storage.list_runs().unwrap();
    let items = storage.load_items(runs[0].id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "On Sale");
    assert!(items[0].sale);
    assert_eq!(items[0].sale_percentage.as_deref(), Some("-50%"));
    assert_eq!(items[0].price.as_deref(), Some("$4.99"));
}

#[tokio::test]
async fn test_fetch_errors_are_counted_and_run_continues() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/search/",
        search_page(&["/app/1/", "/app/2/", "/app/3/"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/app/1/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app/2/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/app/3/", item_page("Survivor", false, false)).await;

    let config = create_test_config(format!("{}/search/", mock_server.uri()), dir.path());
    let mut coordinator = Coordinator::new(config, "hash").unwrap();
    let summary = coordinator.run().await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.accepted_count, 1);
    assert_eq!(summary.errors, 2);
    assert_eq!(summary.processed, 1);
}

#[tokio::test]
async fn test_empty_run_fails() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/search/", search_page(&["/bundle/1/"])).await;

    let config = create_test_config(format!("{}/search/", mock_server.uri()), dir.path());
    let mut coordinator = Coordinator::new(config.clone(), "hash").unwrap();
    let summary = coordinator.run().await.unwrap();

    assert!(!summary.success);
    assert_eq!(summary.accepted_count, 0);
    assert_eq!(summary.pages_processed, 1);
    assert_eq!(
        summary.message.as_deref(),
        Some("No items scraped. Check your search parameters or try a different query.")
    );
    assert!(matches!(
        summary.into_result(),
        Err(CatalogError::EmptyRun { .. })
    ));

    let storage = open_storage(&config);
    let runs = storage.list_runs().unwrap();
    assert_eq!(runs[0].status(), RunStatus::Failed);
    assert!(runs[0].message.is_some());
}

#[tokio::test]
async fn test_runtime_budget_stops_run() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/search/", search_page(&["/app/1/"])).await;
    Mock::given(method("GET"))
        .and(path("/app/1/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(item_page("Slow", false, false))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/search/", mock_server.uri()), dir.path());
    config.limits.max_runtime_secs = 1;
    config.http.timeout_secs = 30;

    let started = Instant::now();
    let mut coordinator = Coordinator::new(config, "hash").unwrap();
    let summary = coordinator.run().await.unwrap();

    assert!(summary.timeout_reached);
    assert!(!summary.success);
    assert!(
        started.elapsed() < Duration::from_secs(8),
        "run should stop at the budget, took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_keyword_seed_url() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.search.keyword = Some("space puzzle".to_string());
    config.output.database_path = dir.path().join("catalog.db").to_string_lossy().into_owned();

    let coordinator = Coordinator::new(config, "hash").unwrap();
    assert_eq!(
        coordinator.search_url().as_str(),
        "https://store.steampowered.com/search/?sort_by=_ASC&supportedlang=english&term=space+puzzle"
    );
}
