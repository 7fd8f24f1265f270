//! Stock quote lookup via the Yahoo Finance chart endpoint.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};

use crate::adapters::{FetchParams, RawRecord, SourceAdapter};
use crate::error::AdapterError;

const DEFAULT_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

static KRX_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("valid regex"));

/// Korean exchange symbols arrive as bare 6-digit codes; the quote API
/// wants the `.KS` suffix. Everything else passes through unchanged.
pub fn normalize_symbol(raw: &str) -> String {
    let s = raw.trim();
    if KRX_NUMERIC.is_match(s) {
        format!("{s}.KS")
    } else {
        s.to_string()
    }
}

pub struct YahooQuotes {
    client: Client,
    endpoint: String,
}

impl YahooQuotes {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch_one(&self, symbol: &str) -> Result<(f64, String), AdapterError> {
        let url = format!(
            "{}/{}?range=1d&interval=1d",
            self.endpoint,
            urlencoding::encode(symbol)
        );
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::HttpStatus(status.as_u16()));
        }
        let value: Value = resp
            .json()
            .await
            .map_err(|e| AdapterError::ParseFailure(e.to_string()))?;

        let meta = value
            .pointer("/chart/result/0/meta")
            .ok_or_else(|| AdapterError::ParseFailure("missing chart metadata".into()))?;
        let price = meta
            .get("regularMarketPrice")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| AdapterError::ParseFailure("missing price".into()))?;
        let currency = meta
            .get("currency")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AdapterError::ParseFailure("missing currency".into()))?;
        Ok((price, currency.to_string()))
    }

    fn symbols_from(params: &FetchParams) -> Vec<String> {
        params
            .filters
            .get("symbols")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|s| s.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_else(|| {
                params
                    .query
                    .split([',', ' '])
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
    }
}

#[async_trait]
impl SourceAdapter for YahooQuotes {
    fn name(&self) -> &'static str {
        "quotes"
    }

    fn description(&self) -> &'static str {
        "Per-symbol price and currency lookup (Yahoo Finance chart API)."
    }

    /// One batch call covering every requested symbol. A symbol that fails
    /// yields a `{symbol, error}` record instead of failing the batch.
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<RawRecord>, AdapterError> {
        let symbols = Self::symbols_from(params);
        let mut out = Vec::with_capacity(symbols.len());
        for raw in &symbols {
            let sym = normalize_symbol(raw);
            match self.fetch_one(&sym).await {
                Ok((price, currency)) => {
                    out.push(json!({ "symbol": sym, "price": price, "currency": currency }));
                }
                Err(e) => {
                    tracing::debug!(symbol = %sym, error = %e, "quote lookup failed");
                    out.push(json!({ "symbol": sym, "error": e.to_string() }));
                }
            }
        }
        Ok(out)
    }
}
