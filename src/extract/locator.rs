//! Prioritized locator strategies
//!
//! Some page regions appear under different markup depending on the item type.
//! A locator list names the candidates in priority order; the first candidate
//! with non-empty text wins.

use super::dom::selector;
use super::ExtractError;
use scraper::{ElementRef, Html};

/// Candidate selectors for the purchase area, most specific first
pub const PURCHASE_AREA_LOCATORS: &[&str] = &[
    "div[id^=game_area_purchase_section_add_to_cart]",
    ".game_area_purchase_game",
];

/// Locates a page region by trying `locators` in order
///
/// Each locator contributes its first matching element. The first element whose
/// text is non-empty is returned. When every candidate is empty, the last element
/// found is returned as-is; when nothing matches at all, `None`.
pub fn locate<'a>(
    document: &'a Html,
    locators: &[&str],
) -> Result<Option<ElementRef<'a>>, ExtractError> {
    let mut fallback = None;

    for css in locators {
        let selector = selector(css)?;
        if let Some(element) = document.select(&selector).next() {
            if element.text().any(|text| !text.trim().is_empty()) {
                return Ok(Some(element));
            }
            fallback = Some(element);
        }
    }

    Ok(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_locator_wins_when_non_empty() {
        let document = Html::parse_document(
            r#"<div id="game_area_purchase_section_add_to_cart_620">primary</div>
               <div class="game_area_purchase_game">generic</div>"#,
        );
        let found = locate(&document, PURCHASE_AREA_LOCATORS).unwrap().unwrap();
        assert_eq!(found.value().attr("id"), Some("game_area_purchase_section_add_to_cart_620"));
    }

    #[test]
    fn test_falls_back_when_first_is_empty() {
        let document = Html::parse_document(
            r#"<div id="game_area_purchase_section_add_to_cart_620">   </div>
               <div class="game_area_purchase_game">generic</div>"#,
        );
        let found = locate(&document, PURCHASE_AREA_LOCATORS).unwrap().unwrap();
        assert_eq!(found.value().attr("class"), Some("game_area_purchase_game"));
    }

    #[test]
    fn test_falls_back_when_first_is_missing() {
        let document =
            Html::parse_document(r#"<div class="game_area_purchase_game">generic</div>"#);
        let found = locate(&document, PURCHASE_AREA_LOCATORS).unwrap().unwrap();
        assert_eq!(found.value().attr("class"), Some("game_area_purchase_game"));
    }

    #[test]
    fn test_all_empty_returns_last_found() {
        let document = Html::parse_document(
            r#"<div id="game_area_purchase_section_add_to_cart_1"></div>
               <div class="game_area_purchase_game"> </div>"#,
        );
        let found = locate(&document, PURCHASE_AREA_LOCATORS).unwrap().unwrap();
        assert_eq!(found.value().attr("class"), Some("game_area_purchase_game"));
    }

    #[test]
    fn test_nothing_found() {
        let document = Html::parse_document("<div>unrelated</div>");
        assert!(locate(&document, PURCHASE_AREA_LOCATORS).unwrap().is_none());
    }
}
