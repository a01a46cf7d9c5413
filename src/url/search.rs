//! Search URL construction and pagination

use crate::config::SearchConfig;
use crate::UrlError;
use url::Url;

/// Store front used to build search URLs
pub const STORE_BASE: &str = "https://store.steampowered.com";

/// Search listing endpoint on the store front
pub const SEARCH_PATH: &str = "/search/";

/// Language filter applied to every constructed search
pub const SEARCH_LANGUAGE: &str = "english";

/// Query parameter that selects the listing page
pub const PAGE_PARAM: &str = "page";

/// Builds the URL of the first search page
///
/// An explicit `start_url` always wins; `keyword` and `sort_by` are only used
/// when no start URL is configured.
///
/// # Examples
///
/// ```
/// use catalog_crawler::config::SearchConfig;
/// use catalog_crawler::url::build_search_url;
///
/// let search = SearchConfig {
///     keyword: Some("puzzle".to_string()),
///     ..SearchConfig::default()
/// };
/// let url = build_search_url(&search).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://store.steampowered.com/search/?sort_by=_ASC&supportedlang=english&term=puzzle"
/// );
/// ```
pub fn build_search_url(search: &SearchConfig) -> Result<Url, UrlError> {
    if let Some(start_url) = &search.start_url {
        let url = Url::parse(start_url).map_err(|e| UrlError::Parse(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }
        return Ok(url);
    }

    let mut url = Url::parse(STORE_BASE)
        .and_then(|base| base.join(SEARCH_PATH))
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("sort_by", &search.sort_by);
        query.append_pair("supportedlang", SEARCH_LANGUAGE);
        if let Some(keyword) = search.keyword.as_deref().filter(|k| !k.is_empty()) {
            query.append_pair("term", keyword);
        }
    }

    Ok(url)
}

/// Returns `base` with its `page` query parameter set to `page`
///
/// The first existing `page` parameter is replaced in place and any duplicates are
/// dropped; when there is none, the parameter is appended. Other parameters keep
/// their order.
pub fn search_page_url(base: &Url, page: u32) -> Url {
    let page_value = page.to_string();
    let mut replaced = false;
    let pairs: Vec<(String, String)> = base
        .query_pairs()
        .filter_map(|(key, value)| {
            if key == PAGE_PARAM {
                if replaced {
                    return None;
                }
                replaced = true;
                return Some((key.into_owned(), page_value.clone()));
            }
            Some((key.into_owned(), value.into_owned()))
        })
        .collect();

    let mut url = base.clone();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(pairs.iter());
        if !replaced {
            query.append_pair(PAGE_PARAM, &page_value);
        }
    }
    url
}
