//! The normalized record produced for one item page

use super::languages::LanguageSupport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A platform an item runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    Linux,
    Mac,
    VrRequired,
}

impl Platform {
    /// Fixed check order, which is also the order platforms appear in a record
    pub const ALL: [Platform; 4] = [
        Platform::Windows,
        Platform::Linux,
        Platform::Mac,
        Platform::VrRequired,
    ];

    /// Class-name fragment of the platform icon
    pub fn icon_class_fragment(&self) -> &'static str {
        match self {
            Self::Windows => "win",
            Self::Linux => "linux",
            Self::Mac => "mac",
            Self::VrRequired => "vr_required",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Mac => "mac",
            Self::VrRequired => "vr_required",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output for one catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    // Identity
    pub url: String,
    pub item_id: Option<String>,

    // Descriptive
    pub title: String,
    pub description: Option<String>,
    pub header_image: Option<String>,
    pub release_date: Option<String>,

    // Classification
    pub coming_soon: bool,
    pub early_access: bool,
    #[serde(rename = "isDLC")]
    pub is_dlc: bool,
    pub base_item_url: Option<String>,

    // Enumerations
    pub supported_platforms: Vec<Platform>,
    pub features: Vec<String>,
    pub genres: Vec<String>,
    pub popular_tags: Vec<String>,
    pub languages: BTreeMap<String, LanguageSupport>,

    // Pricing
    pub price: Option<String>,
    pub sale: bool,
    pub sale_percentage: Option<String>,
    pub sale_until: Option<String>,

    // Reviews
    pub recent_reviews: Option<String>,
    pub all_reviews: Option<String>,

    pub system_requirements: BTreeMap<String, String>,

    // Company
    pub developers: Option<Vec<String>>,
    pub publishers: Option<Vec<String>>,

    pub scraped_at: DateTime<Utc>,
}
