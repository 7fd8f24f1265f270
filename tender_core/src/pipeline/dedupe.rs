//! Duplicate removal on the (title, url) identity key.

use std::collections::HashSet;

use super::types::CanonicalItem;

/// Keep the first occurrence of each identity key. Relative order of
/// surviving items is exactly the order of first occurrence; no
/// re-sorting happens here.
pub fn dedupe(items: Vec<CanonicalItem>) -> Vec<CanonicalItem> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.identity_key()) {
            out.push(item);
        }
    }
    out
}
