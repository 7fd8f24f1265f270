//! The canonical record shape every retrieval path converges to.

use serde::{Deserialize, Serialize};

use crate::fanout::SourceError;

/// Placeholder used when a source record carries no usable title.
pub const TITLE_PLACEHOLDER: &str = "(untitled notice)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Normalized, source-agnostic item.
///
/// Date fields hold an ISO date or the empty string when the source value
/// failed every accepted pattern; that is an explicit outcome, not an
/// error. The budget is kept verbatim because source formats vary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
    #[serde(default)]
    pub agency: String,
    #[serde(default)]
    pub announce_date: String,
    #[serde(default)]
    pub close_date: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub content_type: String,
    /// Set at most once, by the ranking engine. In [0, 1] once ranked.
    #[serde(default)]
    pub score: f64,
}

impl CanonicalItem {
    /// Identity key for deduplication: (title, url) verbatim.
    pub fn identity_key(&self) -> (String, String) {
        (self.title.clone(), self.url.clone().unwrap_or_default())
    }
}

/// Final ordered output of a listing run, immutable once produced. A
/// populated error list is informational degradation, not failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedList {
    pub query: String,
    pub items: Vec<CanonicalItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SourceError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RankedList {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
