//! URL handling module for Catalog-Crawler
//!
//! This module builds the seed search URL, derives later search pages from it,
//! recognizes item detail links and parses catalog identifiers out of them.

mod item;
mod normalize;
mod search;

pub use item::{
    extract_item_id, is_item_link, resolve_link, BUNDLE_PATH_SEGMENT, ITEM_PATH_SEGMENT,
};
pub use normalize::normalize_url;
pub use search::{
    build_search_url, search_page_url, PAGE_PARAM, SEARCH_LANGUAGE, SEARCH_PATH, STORE_BASE,
};
