//! Korean public-procurement bid notices (나라장터, data.go.kr Open API).
//!
//! Endpoint and parameter names are configurable through `PPS_*`
//! environment variables; upstream API revisions periodically rename both.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::adapters::{FetchParams, RawRecord, SourceAdapter};
use crate::config::env_or;
use crate::error::AdapterError;

const DEFAULT_BASE_URL: &str = "https://apis.data.go.kr";
const DEFAULT_ENDPOINT: &str = "/1230000/BidPublicInfoService02/getBidPblancListInfoCnstwk";
const DEFAULT_QUERY_PARAM: &str = "bidNtceNm";
const DEFAULT_PAGE_SIZE: u32 = 100;

pub struct PpsListing {
    client: Client,
    service_key: Option<String>,
    base_url: String,
    endpoint: String,
    query_param: String,
}

impl PpsListing {
    pub fn new(client: Client, service_key: Option<String>) -> Self {
        Self {
            client,
            service_key: service_key.or_else(|| std::env::var("PPS_SERVICE_KEY").ok()),
            base_url: env_or("PPS_BASE_URL", DEFAULT_BASE_URL),
            endpoint: env_or("PPS_ENDPOINT", DEFAULT_ENDPOINT),
            query_param: env_or("PPS_QUERY_PARAM", DEFAULT_QUERY_PARAM),
        }
    }

    fn build_url(&self, pairs: &[(String, String)]) -> String {
        let base = self.base_url.trim_end_matches('/');
        let endpoint = if self.endpoint.starts_with('/') {
            self.endpoint.clone()
        } else {
            format!("/{}", self.endpoint)
        };
        let qs = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{base}{endpoint}?{qs}")
    }

    /// data.go.kr wraps payloads as `response.body.items.item`, where
    /// `item` may be a single object instead of an array.
    fn extract_items(payload: &Value) -> Vec<RawRecord> {
        match payload.pointer("/response/body/items/item") {
            Some(Value::Array(arr)) => arr.clone(),
            Some(Value::Object(obj)) => vec![Value::Object(obj.clone())],
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl SourceAdapter for PpsListing {
    fn name(&self) -> &'static str {
        "pps.data.go.kr"
    }

    fn description(&self) -> &'static str {
        "Public procurement bid-notice listing (data.go.kr Open API)."
    }

    /// Fetches one page of notices. Date-range and other filter values are
    /// forwarded to the upstream API without interpretation.
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<RawRecord>, AdapterError> {
        let key = self
            .service_key
            .as_ref()
            .ok_or_else(|| AdapterError::AuthMissing("set PPS_SERVICE_KEY".into()))?;

        let page = params.page.unwrap_or(1);
        let rows = params.page_size.or(params.limit).unwrap_or(DEFAULT_PAGE_SIZE);

        let mut pairs = vec![
            ("serviceKey".to_string(), key.clone()),
            ("numOfRows".to_string(), rows.to_string()),
            ("pageNo".to_string(), page.to_string()),
            ("type".to_string(), "json".to_string()),
            (self.query_param.clone(), params.query.clone()),
        ];
        for (k, v) in &params.filters {
            let s = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !s.is_empty() {
                pairs.push((k.clone(), s));
            }
        }

        let url = self.build_url(&pairs);
        tracing::debug!(page, rows, "fetching bid notice page");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::HttpStatus(status.as_u16()));
        }
        let payload: Value = resp
            .json()
            .await
            .map_err(|e| AdapterError::ParseFailure(e.to_string()))?;
        Ok(Self::extract_items(&payload))
    }
}
