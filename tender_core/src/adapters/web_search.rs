//! Web search via the Tavily API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::adapters::{FetchParams, RawRecord, SourceAdapter};
use crate::error::AdapterError;

const DEFAULT_ENDPOINT: &str = "https://api.tavily.com/search";

/// Default result count when the caller does not specify one.
pub const DEFAULT_WEB_LIMIT: u32 = 6;

pub struct TavilySearch {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl TavilySearch {
    /// The HTTP client is supplied by the caller and scoped to the run;
    /// there is no process-wide session.
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        let api_key = api_key.or_else(|| std::env::var("TAVILY_API_KEY").ok());
        Self {
            client,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SourceAdapter for TavilySearch {
    fn name(&self) -> &'static str {
        "web"
    }

    fn description(&self) -> &'static str {
        "Tavily web search — blended web/news results with snippets."
    }

    async fn fetch(&self, params: &FetchParams) -> Result<Vec<RawRecord>, AdapterError> {
        let key = self.api_key.as_ref().ok_or_else(|| {
            AdapterError::AuthMissing("set TAVILY_API_KEY or pass an api key".into())
        })?;

        let limit = params.limit.unwrap_or(DEFAULT_WEB_LIMIT);
        let mut body = json!({
            "api_key": key,
            "query": params.query,
            "search_depth": "basic",
            "max_results": limit,
        });
        for (k, v) in &params.filters {
            body[k.as_str()] = v.clone();
        }

        tracing::debug!(query = %params.query, limit, "executing web search");
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::HttpStatus(status.as_u16()));
        }
        let value: Value = resp
            .json()
            .await
            .map_err(|e| AdapterError::ParseFailure(e.to_string()))?;

        Ok(value
            .get("results")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default())
    }
}
