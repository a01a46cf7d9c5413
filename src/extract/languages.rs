//! Language support table extraction

use super::dom::{element_text, selector};
use super::ExtractError;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Glyphs the table uses to mark a supported cell
///
/// The last entry is the heavy check mark after a UTF-8 → Mac Roman mis-decode,
/// which the site has been seen to serve.
const CHECKMARKS: &[&str] = &["\u{2714}", "\u{2713}", "\u{201A}\u{00FA}\u{00EE}"];

/// Emoji presentation selector that may trail a check mark
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Support flags for one language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSupport {
    pub interface: bool,
    pub sound: bool,
    pub subtitles: bool,
}

/// Classification of one language table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageRow {
    /// Column header row
    Header,

    /// Row flagged as an unsupported language
    Unsupported,

    /// Data row without a language name
    Unnamed,

    /// A language with its support flags
    Data {
        name: String,
        support: LanguageSupport,
    },
}

/// Classifies a `tr` element of the language table
pub fn classify_row(row: &ElementRef<'_>) -> Result<LanguageRow, ExtractError> {
    let th = selector("th")?;
    if row.select(&th).any(|cell| !element_text(&cell).is_empty()) {
        return Ok(LanguageRow::Header);
    }

    if row.value().classes().any(|class| class == "unsupported") {
        return Ok(LanguageRow::Unsupported);
    }

    let td = selector("td")?;
    let cells: Vec<String> = row.select(&td).map(|cell| element_text(&cell)).collect();

    let name = match cells.first() {
        Some(name) if !name.is_empty() => name.clone(),
        _ => return Ok(LanguageRow::Unnamed),
    };

    let supported = |index: usize| cells.get(index).map_or(false, |text| is_checkmark(text));

    Ok(LanguageRow::Data {
        name,
        support: LanguageSupport {
            interface: supported(1),
            sound: supported(2),
            subtitles: supported(3),
        },
    })
}

/// Extracts the language table into a name → support mapping
///
/// Header, unsupported and unnamed rows never produce an entry.
pub fn extract_languages(
    document: &Html,
) -> Result<BTreeMap<String, LanguageSupport>, ExtractError> {
    let rows = selector("#languageTable table tr")?;
    let mut languages = BTreeMap::new();

    for row in document.select(&rows) {
        if let LanguageRow::Data { name, support } = classify_row(&row)? {
            languages.insert(name, support);
        }
    }

    Ok(languages)
}

/// Returns true if a cell's text is a check mark
pub fn is_checkmark(text: &str) -> bool {
    let glyph: String = text
        .trim()
        .chars()
        .filter(|c| *c != VARIATION_SELECTOR)
        .collect();
    CHECKMARKS.contains(&glyph.as_str())
}
