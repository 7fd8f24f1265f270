//! Source adapters: one external call batch each, behind a uniform contract.
//!
//! Each adapter owns the translation of its wire format into raw records;
//! nothing outside the adapter boundary branches on wire-format details.

pub mod listing;
pub mod profile;
pub mod quotes;
pub mod web_search;

use crate::error::AdapterError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Opaque, source-shaped record. Lives only for the adapter call that
/// produced it and is discarded after normalization.
pub type RawRecord = Value;

/// Parameters for one adapter call.
///
/// One fixed signature for every adapter; source-specific knobs travel in
/// `filters` and are forwarded opaquely without interpretation.
#[derive(Debug, Clone, Default)]
pub struct FetchParams {
    pub query: String,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub filters: Map<String, Value>,
}

impl FetchParams {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.filters.insert(key.into(), value);
        self
    }
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Unique source label. Doubles as the error-list label and as the
    /// trust-table key for records that carry no source of their own.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Performs one external call batch.
    ///
    /// Safe to invoke concurrently with other adapter calls; adapters hold
    /// no mutable state across invocations and must not retry on failure.
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<RawRecord>, AdapterError>;
}
