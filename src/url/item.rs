//! Item link classification and identifier parsing

use url::Url;

/// Path segment that marks an item detail page
pub const ITEM_PATH_SEGMENT: &str = "/app/";

/// Path segment of bundle pages, which are never treated as items
pub const BUNDLE_PATH_SEGMENT: &str = "/bundle/";

/// Returns true if an anchor href points at an item detail page
pub fn is_item_link(href: &str) -> bool {
    href.contains(ITEM_PATH_SEGMENT) && !href.contains(BUNDLE_PATH_SEGMENT)
}

/// Extracts the numeric catalog identifier from an item URL
///
/// The identifier is the run of digits directly after `/app/`, terminated by `/`, `?`,
/// `#` or the end of the URL.
///
/// # Examples
///
/// ```
/// use catalog_crawler::url::extract_item_id;
///
/// assert_eq!(
///     extract_item_id("https://store.steampowered.com/app/620/Portal_2/"),
///     Some("620".to_string())
/// );
/// assert_eq!(extract_item_id("https://store.steampowered.com/app/abc/"), None);
/// ```
pub fn extract_item_id(url: &str) -> Option<String> {
    let start = url.find(ITEM_PATH_SEGMENT)? + ITEM_PATH_SEGMENT.len();
    let rest = &url[start..];
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    if digits_end == 0 {
        return None;
    }

    match rest[digits_end..].chars().next() {
        None | Some('/') | Some('?') | Some('#') => Some(rest[..digits_end].to_string()),
        _ => None,
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        _ => None,
    }
}
