//! Two-step company profile lookup: search the top candidate pages, then
//! extract their content and summarize it through an opaque collaborator.
//!
//! The whole lookup occupies a single fan-out slot even though it is two
//! sequential external calls plus a summarization.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};

use crate::adapters::{FetchParams, SourceAdapter};
use crate::error::AdapterError;
use crate::fanout::ProfileSummary;

/// At most this many source pages feed the profile summary.
pub const PROFILE_SOURCE_LIMIT: usize = 2;

/// Extracted text is capped before summarization.
const MAX_PROFILE_CHARS: usize = 6000;

static TICKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z]{1,5}|\d{6})$").expect("valid regex"));

/// Whether a query looks like a bare stock symbol (US-style letters or a
/// 6-digit KRX code) rather than free text.
pub fn looks_like_ticker(query: &str) -> bool {
    TICKER_RE.is_match(query.trim())
}

/// Keep only well-formed http(s) URLs.
fn clean_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

/// Pulls readable page content for a set of URLs.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, urls: &[String]) -> Result<String, AdapterError>;
}

/// Opaque summarization collaborator. The core never inspects how the
/// summary is produced; a `None` collapses to an empty summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Option<String>;
}

/// Summarizer that performs no summarization at all.
pub struct NullSummarizer;

#[async_trait]
impl Summarizer for NullSummarizer {
    async fn summarize(&self, _text: &str) -> Option<String> {
        None
    }
}

/// Content extraction via the Tavily extract API.
pub struct TavilyExtract {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl TavilyExtract {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        let api_key = api_key.or_else(|| std::env::var("TAVILY_API_KEY").ok());
        Self {
            client,
            api_key,
            endpoint: "https://api.tavily.com/extract".to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ContentExtractor for TavilyExtract {
    async fn extract(&self, urls: &[String]) -> Result<String, AdapterError> {
        let key = self.api_key.as_ref().ok_or_else(|| {
            AdapterError::AuthMissing("set TAVILY_API_KEY or pass an api key".into())
        })?;

        let body = json!({ "api_key": key, "urls": urls });
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::HttpStatus(status.as_u16()));
        }
        let value: Value = resp
            .json()
            .await
            .map_err(|e| AdapterError::ParseFailure(e.to_string()))?;

        let mut text = value
            .get("results")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|r| r.get("raw_content").and_then(|v| v.as_str()))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
            .unwrap_or_default();
        if text.len() > MAX_PROFILE_CHARS {
            // Truncate on a char boundary.
            let cut = text
                .char_indices()
                .take_while(|(i, _)| *i < MAX_PROFILE_CHARS)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            text.truncate(cut);
        }
        Ok(text)
    }
}

/// The profile capability: search top candidate URLs, extract, summarize.
pub struct ProfileLookup {
    search: Arc<dyn SourceAdapter>,
    extractor: Arc<dyn ContentExtractor>,
    summarizer: Arc<dyn Summarizer>,
}

impl ProfileLookup {
    pub fn new(
        search: Arc<dyn SourceAdapter>,
        extractor: Arc<dyn ContentExtractor>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            search,
            extractor,
            summarizer,
        }
    }

    /// Search → top-2 URLs → extract → summarize, sequentially. No URLs or
    /// no extractable text is an empty summary, not a failure.
    pub async fn lookup(&self, query: &str) -> Result<ProfileSummary, AdapterError> {
        let params = FetchParams::query(format!("{query} company profile overview"))
            .with_limit(PROFILE_SOURCE_LIMIT as u32);
        let records = self.search.fetch(&params).await?;

        let urls: Vec<String> = records
            .iter()
            .filter_map(|r| r.get("url").and_then(|v| v.as_str()))
            .filter_map(clean_url)
            .take(PROFILE_SOURCE_LIMIT)
            .collect();
        if urls.is_empty() {
            return Ok(ProfileSummary::default());
        }

        let text = self.extractor.extract(&urls).await?;
        let summary = if text.is_empty() {
            String::new()
        } else {
            self.summarizer.summarize(&text).await.unwrap_or_default()
        };
        Ok(ProfileSummary { summary, sources: urls })
    }
}
