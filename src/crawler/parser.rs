//! Search page parser
//!
//! This module extracts the candidate item links from a search results page:
//! - Only `<a href="...">` anchors are considered
//! - The href must point at an item detail page and not at a bundle
//! - Links are resolved against the page URL and normalized

use crate::url::{is_item_link, normalize_url, resolve_link};
use scraper::{Html, Selector};
use url::Url;

/// Extracts item links from a search results page
///
/// Links are returned in document order. Duplicates are kept; deduplication by
/// item identifier is the frontier's job.
///
/// # Arguments
///
/// * `html` - The search page body
/// * `base_url` - The URL the page was fetched from, used to resolve relative links
///
/// # Returns
///
/// The absolute, normalized item URLs found on the page
///
/// # Example
///
/// ```
/// use catalog_crawler::crawler::extract_item_links;
/// use url::Url;
///
/// let html = r#"<a href="/app/620/Portal_2/">Portal 2</a><a href="/bundle/1/">Bundle</a>"#;
/// let base_url = Url::parse("https://store.steampowered.com/search/").unwrap();
/// let links = extract_item_links(html, &base_url);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://store.steampowered.com/app/620/Portal_2/");
/// ```
pub fn extract_item_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    item_links(&document, base_url)
}

fn item_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| is_item_link(href))
        .filter_map(|href| resolve_link(href, base_url))
        .map(|url| normalize_url(&url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://store.example.com/search/?term=puzzle&page=2").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        extract_item_links(html, &base_url())
            .into_iter()
            .map(|url| url.to_string())
            .collect()
    }

    #[test]
    fn test_extract_absolute_item_link() {
        let html = r#"<a href="https://store.example.com/app/10/Counter_Strike/">CS</a>"#;
        assert_eq!(
            links(html),
            vec!["https://store.example.com/app/10/Counter_Strike/"]
        );
    }

    #[test]
    fn test_extract_relative_item_link() {
        let html = r#"<a href="/app/20/">TFC</a>"#;
        assert_eq!(links(html), vec!["https://store.example.com/app/20/"]);
    }

    #[test]
    fn test_skip_bundle_links() {
        let html = r#"<a href="/bundle/234/">Bundle</a><a href="/bundle/234/app/5/">Nested</a>"#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_skip_non_item_links() {
        let html = r#"
            <a href="/search/?page=3">Next</a>
            <a href="/sub/1/">Package</a>
            <a href="javascript:void(0)">Nothing</a>
            <a>No href</a>
        "#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_tracking_params_stripped() {
        let html = r#"<a href="https://store.example.com/app/30/?snr=1_7_7_151_150_1#reviews">DoD</a>"#;
        assert_eq!(links(html), vec!["https://store.example.com/app/30/"]);
    }

    #[test]
    fn test_duplicates_kept_in_document_order() {
        let html = r#"
            <a href="/app/40/">One</a>
            <a href="/app/50/">Two</a>
            <a href="/app/40/?snr=x">One again</a>
        "#;
        assert_eq!(
            links(html),
            vec![
                "https://store.example.com/app/40/",
                "https://store.example.com/app/50/",
                "https://store.example.com/app/40/",
            ]
        );
    }

    #[test]
    fn test_empty_page() {
        assert!(links("").is_empty());
    }
}
