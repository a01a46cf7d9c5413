//! Item page extraction
//!
//! This module turns the markup of an item detail page into an [`ItemRecord`]:
//! - Field extractors, one per semantic field
//! - Prioritized locators for regions with alternative markup
//! - The language table classifier
//! - The record assembler that composes them

mod assemble;
mod dom;
mod fields;
mod languages;
mod locator;
mod pricing;
mod record;

pub use assemble::{assemble_record, extract_item_record};
pub use fields::{
    extract_base_item_url, extract_coming_soon, extract_description, extract_developers,
    extract_early_access, extract_features, extract_genres, extract_header_image,
    extract_platforms, extract_popular_tags, extract_publishers, extract_release_date,
    extract_reviews, extract_system_requirements, extract_title, is_dlc, Reviews,
    DEFAULT_REQUIREMENTS_PLATFORM, DLC_FEATURE_LABELS,
};
pub use languages::{classify_row, extract_languages, is_checkmark, LanguageRow, LanguageSupport};
pub use locator::{locate, PURCHASE_AREA_LOCATORS};
pub use pricing::{extract_pricing, normalize_price, Pricing, FREE_PRICE};
pub use record::{ItemRecord, Platform};

use thiserror::Error;

/// Errors raised while extracting a record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Cannot extract from {url}: {message}")]
    Page { url: String, message: String },
}
