//! Small helpers over `scraper` shared by the field extractors

use super::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// Compiles a CSS selector, reporting the offending selector on failure
pub fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Concatenated, trimmed text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text with inner whitespace runs collapsed to single spaces
pub fn collapsed_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text of the first element matching `css`, if any
pub fn first_text(document: &Html, css: &str) -> Result<Option<String>, ExtractError> {
    let selector = selector(css)?;
    Ok(document.select(&selector).next().map(|e| element_text(&e)))
}

/// Trimmed text of the first match, with empty text treated as absent
pub fn first_non_empty_text(document: &Html, css: &str) -> Result<Option<String>, ExtractError> {
    Ok(first_text(document, css)?.filter(|text| !text.is_empty()))
}

/// Texts of every element matching `css`, in document order
pub fn all_texts(document: &Html, css: &str) -> Result<Vec<String>, ExtractError> {
    let selector = selector(css)?;
    Ok(document.select(&selector).map(|e| collapsed_text(&e)).collect())
}

/// Texts of every element matching `css` below `root`, in document order
pub fn texts_within(root: &ElementRef<'_>, css: &str) -> Result<Vec<String>, ExtractError> {
    let selector = selector(css)?;
    Ok(root.select(&selector).map(|e| collapsed_text(&e)).collect())
}

/// Trimmed text of the first element matching `css` below `root`, empty → None
pub fn text_within(root: &ElementRef<'_>, css: &str) -> Result<Option<String>, ExtractError> {
    let selector = selector(css)?;
    Ok(root
        .select(&selector)
        .next()
        .map(|e| element_text(&e))
        .filter(|text| !text.is_empty()))
}

/// Converts an empty string to None
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_is_reported() {
        let err = selector("div[").unwrap_err();
        assert!(matches!(err, ExtractError::Selector { ref selector, .. } if selector == "div["));
    }

    #[test]
    fn test_first_text_trims() {
        let document = Html::parse_document("<p class='a'>  hello  </p><p class='a'>x</p>");
        assert_eq!(first_text(&document, ".a").unwrap(), Some("hello".to_string()));
        assert_eq!(first_text(&document, ".b").unwrap(), None);
    }

    #[test]
    fn test_first_non_empty_text() {
        let document = Html::parse_document("<p class='a'>   </p>");
        assert_eq!(first_non_empty_text(&document, ".a").unwrap(), None);
    }

    #[test]
    fn test_all_texts_collapses_whitespace() {
        let document =
            Html::parse_document("<div><a>Single\n   player</a><a></a><a>Co-op</a></div>");
        assert_eq!(
            all_texts(&document, "div a").unwrap(),
            vec!["Single player".to_string(), String::new(), "Co-op".to_string()]
        );
    }
}
