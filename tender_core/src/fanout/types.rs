//! Types for the concurrent multi-source retrieval run.

use serde::{Deserialize, Serialize};

use crate::adapters::RawRecord;
use crate::pipeline::CanonicalItem;

/// Error from a source that failed during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceError {
    pub source: String,
    pub error: String,
    #[serde(default)]
    pub is_timeout: bool,
}

/// One quote row. A symbol that could not be resolved carries its error
/// inline rather than failing the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Quote {
    /// Minimal shape validation for quote records. Entries without a
    /// symbol are dropped; nothing else is interpreted.
    pub fn from_records(records: &[RawRecord]) -> Vec<Quote> {
        records
            .iter()
            .filter_map(|r| {
                let symbol = r.get("symbol").and_then(|v| v.as_str())?.to_string();
                Some(Quote {
                    symbol,
                    price: r.get("price").and_then(|v| v.as_f64()),
                    currency: r.get("currency").and_then(|v| v.as_str()).map(str::to_string),
                    error: r.get("error").and_then(|v| v.as_str()).map(str::to_string),
                })
            })
            .collect()
    }
}

/// Extracted-and-summarized company overview with its source URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

/// Complete output of one fan-out run, immutable once produced.
///
/// A populated error list coexisting with results is informational
/// degradation; total loss of all sources still yields a well-formed
/// report. Callers never see a run-level failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalReport {
    pub query: String,
    /// Ranked document items (the web task, after the pipeline).
    pub items: Vec<CanonicalItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotes: Vec<Quote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SourceError>,
    /// True when at least one source failed or timed out.
    #[serde(default)]
    pub partial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RetrievalReport {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            items: Vec::new(),
            quotes: Vec::new(),
            profile: None,
            errors: Vec::new(),
            partial: false,
            duration_ms: None,
        }
    }

    pub fn add_error(
        &mut self,
        source: impl Into<String>,
        error: impl Into<String>,
        is_timeout: bool,
    ) {
        self.errors.push(SourceError {
            source: source.into(),
            error: error.into(),
            is_timeout,
        });
        self.partial = true;
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn all_failed(&self) -> bool {
        self.items.is_empty()
            && self.quotes.is_empty()
            && self.profile.is_none()
            && !self.errors.is_empty()
    }
}

/// Per-label result slots filled by exactly one task each. Slots are
/// independently owned and merged only after all tasks have joined, so
/// the tasks never contend on shared state.
#[derive(Debug, Default)]
pub(crate) struct ResultBag {
    pub web: Option<Vec<RawRecord>>,
    pub quotes: Option<Vec<Quote>>,
    pub profile: Option<ProfileSummary>,
    pub errors: Vec<SourceError>,
}
