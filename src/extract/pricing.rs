//! Price and discount extraction

use super::dom::{non_empty, text_within};
use super::locator::{locate, PURCHASE_AREA_LOCATORS};
use super::ExtractError;
use scraper::Html;

/// Literal used for free items
pub const FREE_PRICE: &str = "Free";

/// Pricing fields of an item record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pricing {
    /// "Free", the trimmed price text, or None when no price was found
    pub price: Option<String>,

    /// Whether the item is discounted
    pub sale: bool,

    /// Discount label such as "-50%"; only set on sale
    pub sale_percentage: Option<String>,

    /// Discount countdown text; only set on sale
    pub sale_until: Option<String>,
}

/// Extracts pricing from the purchase area
///
/// The purchase area is located through [`PURCHASE_AREA_LOCATORS`]. A plain price
/// element means a regular price. Without one the item is treated as discounted and
/// the discount percentage, countdown and final price are read from the discount
/// block instead. Pages without any purchase area carry no pricing.
pub fn extract_pricing(document: &Html) -> Result<Pricing, ExtractError> {
    let Some(area) = locate(document, PURCHASE_AREA_LOCATORS)? else {
        return Ok(Pricing::default());
    };

    if let Some(price) = text_within(&area, ".game_purchase_price")? {
        return Ok(Pricing {
            price: normalize_price(&price),
            ..Pricing::default()
        });
    }

    let final_price = text_within(&area, ".discount_final_price")?;
    Ok(Pricing {
        price: final_price.as_deref().and_then(normalize_price),
        sale: true,
        sale_percentage: text_within(&area, ".discount_pct")?,
        sale_until: text_within(&area, ".game_purchase_discount_countdown")?,
    })
}

/// Normalizes raw price text
///
/// Anything mentioning "free" (any case) becomes [`FREE_PRICE`]; other text is kept
/// verbatim after trimming. Empty text means no price.
pub fn normalize_price(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.to_lowercase().contains("free") {
        return Some(FREE_PRICE.to_string());
    }
    non_empty(trimmed.to_string())
}
