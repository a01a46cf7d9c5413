//! Record assembler: composes the field extractors into one [`ItemRecord`]

use super::fields::{
    extract_base_item_url, extract_coming_soon, extract_description, extract_developers,
    extract_early_access, extract_features, extract_genres, extract_header_image,
    extract_platforms, extract_popular_tags, extract_publishers, extract_release_date,
    extract_reviews, extract_system_requirements, extract_title, is_dlc,
};
use super::languages::extract_languages;
use super::pricing::extract_pricing;
use super::record::ItemRecord;
use super::ExtractError;
use crate::url::extract_item_id;
use chrono::Utc;
use scraper::Html;

/// Parses an item page body and assembles its record
///
/// # Returns
///
/// * `Ok(Some(ItemRecord))` - The page is an item page
/// * `Ok(None)` - The page has no title, so it is not an item page
/// * `Err(ExtractError)` - The page could not be processed at all
pub fn extract_item_record(html: &str, url: &str) -> Result<Option<ItemRecord>, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::Page {
            url: url.to_string(),
            message: "empty document".to_string(),
        });
    }

    let document = Html::parse_document(html);
    assemble_record(&document, url)
}

/// Assembles a record from a parsed item page
///
/// The title is required: without one no record is produced. Every other field
/// degrades to its empty value on error, with a warning.
pub fn assemble_record(document: &Html, url: &str) -> Result<Option<ItemRecord>, ExtractError> {
    let Some(title) = extract_title(document)? else {
        tracing::debug!("No title on {}, not an item page", url);
        return Ok(None);
    };

    let features = field(url, "features", extract_features(document));
    let is_dlc = is_dlc(&features);
    let base_item_url = if is_dlc {
        field(url, "baseItemUrl", extract_base_item_url(document))
    } else {
        None
    };

    let pricing = field(url, "price", extract_pricing(document));
    let reviews = field(url, "reviews", extract_reviews(document));

    Ok(Some(ItemRecord {
        url: url.to_string(),
        item_id: extract_item_id(url),
        title,
        description: field(url, "description", extract_description(document)),
        header_image: field(url, "headerImage", extract_header_image(document)),
        release_date: field(url, "releaseDate", extract_release_date(document)),
        coming_soon: field(url, "comingSoon", extract_coming_soon(document)),
        early_access: field(url, "earlyAccess", extract_early_access(document)),
        is_dlc,
        base_item_url,
        supported_platforms: field(url, "supportedPlatforms", extract_platforms(document)),
        features,
        genres: field(url, "genres", extract_genres(document)),
        popular_tags: field(url, "popularTags", extract_popular_tags(document)),
        languages: field(url, "languages", extract_languages(document)),
        price: pricing.price,
        sale: pricing.sale,
        sale_percentage: pricing.sale_percentage,
        sale_until: pricing.sale_until,
        recent_reviews: reviews.recent,
        all_reviews: reviews.all,
        system_requirements: field(
            url,
            "systemRequirements",
            extract_system_requirements(document),
        ),
        developers: field(url, "developers", extract_developers(document)),
        publishers: field(url, "publishers", extract_publishers(document)),
        scraped_at: Utc::now(),
    }))
}

/// Falls back to the field's empty value when its extractor fails
fn field<T: Default>(url: &str, name: &str, result: Result<T, ExtractError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("Field {} on {} fell back to its default: {}", name, url, e);
        T::default()
    })
}
