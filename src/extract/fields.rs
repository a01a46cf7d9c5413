//! Single-field extractors for item pages
//!
//! Every extractor returns the field's empty value when the markup is missing.
//! Errors are reserved for selectors that fail to compile.

use super::dom::{
    all_texts, element_text, first_non_empty_text, first_text, non_empty, selector,
    texts_within,
};
use super::record::Platform;
use super::ExtractError;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

/// Feature labels that mark an item as downloadable content
pub const DLC_FEATURE_LABELS: &[&str] = &["DLC", "Downloadable Content"];

/// Platform key used for requirement blocks without a tab label
pub const DEFAULT_REQUIREMENTS_PLATFORM: &str = "windows";

/// Review summaries shown on an item page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reviews {
    pub recent: Option<String>,
    pub all: Option<String>,
}

pub fn extract_title(document: &Html) -> Result<Option<String>, ExtractError> {
    first_non_empty_text(document, "#appHubAppName")
}

pub fn extract_description(document: &Html) -> Result<Option<String>, ExtractError> {
    first_non_empty_text(document, ".game_description_snippet")
}

pub fn extract_header_image(document: &Html) -> Result<Option<String>, ExtractError> {
    let selector = selector(".game_header_image_full")?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string))
}

pub fn extract_release_date(document: &Html) -> Result<Option<String>, ExtractError> {
    first_non_empty_text(document, ".release_date .date")
}

/// Reads the recent and overall review summaries
///
/// The first summary on the page is the recent one and the last is the overall
/// one; with a single summary both fields carry the same text.
pub fn extract_reviews(document: &Html) -> Result<Reviews, ExtractError> {
    let selector = selector(".game_review_summary")?;
    let summaries: Vec<ElementRef<'_>> = document.select(&selector).collect();

    Ok(Reviews {
        recent: summaries.first().and_then(|e| non_empty(element_text(e))),
        all: summaries.last().and_then(|e| non_empty(element_text(e))),
    })
}

/// Developer names, or None when the developer list is missing
pub fn extract_developers(document: &Html) -> Result<Option<Vec<String>>, ExtractError> {
    let list = selector("#developers_list")?;
    match document.select(&list).next() {
        Some(list) => Ok(Some(texts_within(&list, "a")?)),
        None => Ok(None),
    }
}

/// Publisher names from the last developer row of the purchase area
pub fn extract_publishers(document: &Html) -> Result<Option<Vec<String>>, ExtractError> {
    let rows = selector(".game_area_purchase_game .dev_row")?;
    match document.select(&rows).last() {
        Some(row) => Ok(Some(texts_within(&row, ".summary a")?)),
        None => Ok(None),
    }
}

pub fn extract_coming_soon(document: &Html) -> Result<bool, ExtractError> {
    Ok(first_text(document, ".game_area_comingsoon")?.map_or(false, |text| !text.is_empty()))
}

pub fn extract_early_access(document: &Html) -> Result<bool, ExtractError> {
    Ok(first_text(document, "#earlyAccessHeader")?.map_or(false, |text| !text.is_empty()))
}

/// Detects platform icons in the purchase area
///
/// Each platform is reported once, in [`Platform::ALL`] order, when any icon's class
/// attribute contains its class fragment.
pub fn extract_platforms(document: &Html) -> Result<Vec<Platform>, ExtractError> {
    let icons = selector(".game_area_purchase_platform span")?;
    let classes: Vec<&str> = document
        .select(&icons)
        .filter_map(|icon| icon.value().attr("class"))
        .collect();

    Ok(Platform::ALL
        .into_iter()
        .filter(|platform| {
            classes
                .iter()
                .any(|class| class.contains(platform.icon_class_fragment()))
        })
        .collect())
}

/// Genre links from the first span of the genre block
pub fn extract_genres(document: &Html) -> Result<Vec<String>, ExtractError> {
    let spans = selector("#genresAndManufacturer span")?;
    match document.select(&spans).next() {
        Some(span) => texts_within(&span, "a"),
        None => Ok(Vec::new()),
    }
}

pub fn extract_features(document: &Html) -> Result<Vec<String>, ExtractError> {
    all_texts(document, ".game_area_features_list_ctn a")
}

pub fn extract_popular_tags(document: &Html) -> Result<Vec<String>, ExtractError> {
    all_texts(document, ".popular_tags a")
}

/// Returns true if the feature list marks the item as downloadable content
pub fn is_dlc(features: &[String]) -> bool {
    features
        .iter()
        .any(|feature| DLC_FEATURE_LABELS.contains(&feature.as_str()))
}

/// Link to the base item of a DLC, read from the glance details beside the header image
pub fn extract_base_item_url(document: &Html) -> Result<Option<String>, ExtractError> {
    let header = selector("#gameHeaderImageCtn")?;
    let link = selector(".glance_details p a")?;

    let container = document
        .select(&header)
        .next()
        .and_then(|ctn| ctn.parent())
        .and_then(ElementRef::wrap);

    Ok(container
        .and_then(|parent| parent.select(&link).next())
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string))
}

/// Requirement blocks keyed by lowercased platform tab label
///
/// Blocks without a tab label are keyed [`DEFAULT_REQUIREMENTS_PLATFORM`]; blocks with
/// no requirement text are dropped. A later block replaces an earlier one with the
/// same key.
pub fn extract_system_requirements(
    document: &Html,
) -> Result<BTreeMap<String, String>, ExtractError> {
    let blocks = selector(".game_area_sys_req_leftCol")?;
    let tab = selector(".sysreq_tab")?;
    let full = selector(".game_area_sys_req_full")?;

    let mut requirements = BTreeMap::new();
    for block in document.select(&blocks) {
        let platform = block
            .select(&tab)
            .map(|label| element_text(&label))
            .collect::<String>()
            .trim()
            .to_lowercase();
        let platform = if platform.is_empty() {
            DEFAULT_REQUIREMENTS_PLATFORM.to_string()
        } else {
            platform
        };

        let text = block
            .select(&full)
            .map(|req| element_text(&req))
            .collect::<String>();
        if !text.is_empty() {
            requirements.insert(platform, text);
        }
    }

    Ok(requirements)
}
