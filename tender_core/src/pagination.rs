//! Sequential paginated fetch with early-stop rules, and the listing
//! pipeline built on top of it.

use std::time::Instant;

use serde_json::{Map, Value};

use crate::adapters::{FetchParams, RawRecord, SourceAdapter};
use crate::config::ListingConfig;
use crate::error::AdapterError;
use crate::fanout::SourceError;
use crate::pipeline::{dedupe, normalize_all, rank, RankedList};

/// Fetch every page up to `max_pages`, stopping early on an empty page
/// (no more data) or a short page (last page reached). Each stop decision
/// depends on the previous page's result, so pages are fetched strictly
/// sequentially. A failed page call is terminal for the whole fetch.
pub async fn fetch_all_pages(
    adapter: &dyn SourceAdapter,
    query: &str,
    page_size: u32,
    max_pages: u32,
    filters: &Map<String, Value>,
) -> Result<Vec<RawRecord>, AdapterError> {
    let mut out = Vec::new();
    for page in 1..=max_pages {
        let params = FetchParams {
            query: query.to_string(),
            limit: None,
            page: Some(page),
            page_size: Some(page_size),
            filters: filters.clone(),
        };
        let records = adapter.fetch(&params).await?;
        tracing::debug!(page, count = records.len(), "fetched listing page");
        if records.is_empty() {
            break;
        }
        let short = (records.len() as u32) < page_size;
        out.extend(records);
        if short {
            break;
        }
    }
    Ok(out)
}

/// Listing path: paginate → normalize → dedupe → rank. An adapter
/// failure becomes one labeled error entry alongside an empty item list;
/// this function itself cannot fail.
pub async fn find_notices(
    adapter: &dyn SourceAdapter,
    query: &str,
    config: &ListingConfig,
) -> RankedList {
    let start = Instant::now();
    let mut errors = Vec::new();
    let records = match fetch_all_pages(
        adapter,
        query,
        config.page_size,
        config.max_pages,
        &config.filters(),
    )
    .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::debug!(source = adapter.name(), error = %e, "listing fetch failed");
            errors.push(SourceError {
                source: adapter.name().to_string(),
                error: e.to_string(),
                is_timeout: e.is_timeout(),
            });
            Vec::new()
        }
    };

    let items = rank(dedupe(normalize_all(&records, adapter.name(), "notice")), query);
    RankedList {
        query: query.to_string(),
        items,
        errors,
        duration_ms: Some(start.elapsed().as_millis() as u64),
    }
}
