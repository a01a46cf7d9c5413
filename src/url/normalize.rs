use url::Url;

/// Query parameters that only carry navigation tracking
const TRACKING_PARAMS: &[&str] = &["snr", "curator_clanid", "fbclid", "gclid", "ref", "source"];

/// Canonicalizes an item detail URL before it is enqueued
///
/// # Normalization Steps
///
/// 1. Remove the fragment
/// 2. Remove tracking query parameters (`snr`, `utm_*`, ...)
/// 3. Remove an empty query string
///
/// Scheme, host and path are left untouched, so the URL still points at the
/// server it was discovered on.
///
/// # Examples
///
/// ```
/// use catalog_crawler::url::normalize_url;
/// use url::Url;
///
/// let url = Url::parse("https://store.steampowered.com/app/620/Portal_2/?snr=1_7_7#app_reviews").unwrap();
/// assert_eq!(
///     normalize_url(&url).as_str(),
///     "https://store.steampowered.com/app/620/Portal_2/"
/// );
/// ```
pub fn normalize_url(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept.iter());
        }
    }

    url
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
