//! Table-driven normalization of source-shaped records.
//!
//! Source schemas disagree on field names. Every canonical attribute is
//! resolved by walking an ordered candidate list and taking the first
//! non-empty match; these tables are the only place that variance lives.
//! Normalization never fails an item — worst case every optional field is
//! empty and the title falls back to a placeholder.

use serde_json::Value;

use super::types::{Attachment, CanonicalItem, TITLE_PLACEHOLDER};
use crate::adapters::RawRecord;

const TITLE_FIELDS: &[&str] = &["bidNtceNm", "title", "name"];
const URL_FIELDS: &[&str] = &["bidNtceDtlUrl", "url", "link"];
const AGENCY_FIELDS: &[&str] = &["ntceInsttNm", "dminsttNm", "agency", "organ"];
const ANNOUNCE_FIELDS: &[&str] = &[
    "ntceDt",
    "bidNtceDate",
    "announce_date",
    "announceDate",
    "published_date",
];
const CLOSE_FIELDS: &[&str] = &[
    "bidClseDt",
    "opengDt",
    "rlOpngDt",
    "bidEndDt",
    "close_date",
    "closeDate",
];
const BUDGET_FIELDS: &[&str] = &["presmptPrce", "asignBdgtAmt", "purchsBudgetAmt", "budget"];
const SNIPPET_FIELDS: &[&str] = &["snippet", "content", "description", "summary"];
const ATTACHMENT_FIELDS: &[&str] = &["atchFileList", "attachments"];
const SOURCE_FIELDS: &[&str] = &["source"];

/// Accepted date/time layouts, in the order they are tried.
const DATE_PATTERNS: &[&str] = &[
    "%Y%m%d%H%M",
    "%Y%m%d%H%M%S",
    "%Y%m%d",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
];

/// First non-empty string among the candidate fields. Numbers are
/// stringified; other value shapes are skipped.
fn first_text(record: &RawRecord, candidates: &[&str]) -> String {
    for field in candidates {
        if let Some(v) = record.get(*field) {
            let s = match v {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            };
            if !s.is_empty() {
                return s;
            }
        }
    }
    String::new()
}

/// Parse a date-like source value into an ISO date. The first pattern that
/// parses wins; if none do, the result is the empty string.
pub fn to_iso_date(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }
    for pattern in DATE_PATTERNS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, pattern) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, pattern) {
            return d.format("%Y-%m-%d").to_string();
        }
    }
    String::new()
}

/// First candidate field whose value actually parses as a date. A field
/// holding an unparseable value does not shadow later candidates.
fn first_date(record: &RawRecord, candidates: &[&str]) -> String {
    for field in candidates {
        let raw = first_text(record, &[field]);
        if raw.is_empty() {
            continue;
        }
        let iso = to_iso_date(&raw);
        if !iso.is_empty() {
            return iso;
        }
    }
    String::new()
}

fn parse_attachments(record: &RawRecord) -> Vec<Attachment> {
    for field in ATTACHMENT_FIELDS {
        let Some(Value::Array(arr)) = record.get(*field) else {
            continue;
        };
        return arr
            .iter()
            .enumerate()
            .filter_map(|(i, a)| match a {
                Value::Object(_) => {
                    let name = a
                        .get("name")
                        .or_else(|| a.get("title"))
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("attachment {}", i + 1));
                    let url = a
                        .get("url")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    Some(Attachment { name, url })
                }
                Value::String(s) if !s.is_empty() => Some(Attachment {
                    name: format!("attachment {}", i + 1),
                    url: s.clone(),
                }),
                _ => None,
            })
            .collect();
    }
    Vec::new()
}

/// Map one raw record into the canonical shape.
pub fn normalize(record: &RawRecord, default_source: &str, content_type: &str) -> CanonicalItem {
    let title = first_text(record, TITLE_FIELDS);
    let url = first_text(record, URL_FIELDS);
    let source = first_text(record, SOURCE_FIELDS);

    CanonicalItem {
        title: if title.is_empty() {
            TITLE_PLACEHOLDER.to_string()
        } else {
            title
        },
        url: (!url.is_empty()).then_some(url),
        source: if source.is_empty() {
            default_source.to_string()
        } else {
            source
        },
        agency: first_text(record, AGENCY_FIELDS),
        announce_date: first_date(record, ANNOUNCE_FIELDS),
        close_date: first_date(record, CLOSE_FIELDS),
        budget: first_text(record, BUDGET_FIELDS),
        snippet: first_text(record, SNIPPET_FIELDS),
        attachments: parse_attachments(record),
        content_type: content_type.to_string(),
        score: 0.0,
    }
}

/// Normalize a batch; the raw records are discarded afterwards.
pub fn normalize_all(
    records: &[RawRecord],
    default_source: &str,
    content_type: &str,
) -> Vec<CanonicalItem> {
    records
        .iter()
        .map(|r| normalize(r, default_source, content_type))
        .collect()
}
