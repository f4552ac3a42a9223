//! Canonical metadata record shared by every crawler
//!
//! All sources, whatever their markup, fill the same record shape. Fields a
//! source does not claim are left untouched so records can be layered across
//! sources by an orchestrator; nothing here merges or prioritizes.

use serde::{Deserialize, Serialize};

/// One item's metadata, as filled by a crawler
///
/// Every field except `identifier` is optional. A crawler writes its fields
/// in a single pass after extraction fully succeeds; on any failure the
/// record is left exactly as the caller passed it in.
///
/// The `identifier` is the business key used to locate the item. A source
/// that reveals the item's canonical code spelling may correct it
/// (last writer wins); callers that need the original request string should
/// keep their own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Catalog code identifying the item
    pub identifier: String,

    /// Exact page URL the data came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Cover image URL, query string stripped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    /// Cast names in source order, whitespace-normalized so the same person
    /// compares equal across sources
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,

    /// ISO-like date token taken verbatim from the source, never parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Genres in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,

    /// Preview image URLs in source order, query strings stripped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preview_image_urls: Vec<String>,

    /// Whether the item is uncensored. This is a fact about the source and
    /// its jurisdiction, set per crawler, never inferred from page content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_uncensored: Option<bool>,
}

impl MetadataRecord {
    /// Creates an empty record for the given identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        MetadataRecord {
            identifier: identifier.into(),
            source_url: None,
            title: None,
            cover_image_url: None,
            cast: Vec::new(),
            duration_minutes: None,
            release_date: None,
            publisher: None,
            label: None,
            genres: Vec::new(),
            synopsis: None,
            preview_image_urls: Vec::new(),
            is_uncensored: None,
        }
    }
}
