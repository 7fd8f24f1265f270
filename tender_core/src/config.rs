//! Environment-driven configuration for adapters and runs.

use chrono::{Duration, Local};
use serde_json::{json, Map, Value};

pub(crate) fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Bounds for one fan-out run.
#[derive(Debug, Clone)]
pub struct FanOutConfig {
    /// Maximum concurrently executing source tasks.
    pub max_concurrency: usize,
    /// Outer deadline for the whole run, in milliseconds. Tasks still
    /// pending at expiry are abandoned and recorded as timeouts.
    pub deadline_ms: u64,
    /// Result count requested from the web source.
    pub web_limit: u32,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            deadline_ms: 20_000,
            web_limit: 6,
        }
    }
}

/// Paginated listing parameters. `from_env` resolves the `PPS_*`
/// variables with a last-30-days default date window.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub page_size: u32,
    pub max_pages: u32,
    /// `%Y%m%d%H%M`, forwarded opaquely to the adapter.
    pub date_from: String,
    pub date_to: String,
    pub inqry_div: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_pages: 3,
            date_from: String::new(),
            date_to: String::new(),
            inqry_div: "1".to_string(),
        }
    }
}

impl ListingConfig {
    pub fn from_env() -> Self {
        let last_days: i64 = env_parse("PPS_DEFAULT_LAST_DAYS", 30);
        let now = Local::now();
        let default_from = (now - Duration::days(last_days)).format("%Y%m%d%H%M").to_string();
        let default_to = now.format("%Y%m%d%H%M").to_string();
        Self {
            page_size: env_parse("PPS_ROWS", 100),
            max_pages: env_parse("PPS_PAGE_MAX", 3),
            date_from: env_or("PPS_DATE_FROM", &default_from).replace([' ', '-'], ""),
            date_to: env_or("PPS_DATE_TO", &default_to).replace([' ', '-'], ""),
            inqry_div: env_or("PPS_INQRY_DIV", "1"),
        }
    }

    /// Opaque filter parameters forwarded to the listing adapter; their
    /// semantics belong to the upstream API, not to this crate.
    pub fn filters(&self) -> Map<String, Value> {
        let mut filters = Map::new();
        if !self.date_from.is_empty() {
            filters.insert("inqryBgnDt".into(), json!(self.date_from));
        }
        if !self.date_to.is_empty() {
            filters.insert("inqryEndDt".into(), json!(self.date_to));
        }
        if !self.inqry_div.is_empty() {
            filters.insert("inqryDiv".into(), json!(self.inqry_div));
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fanout_defaults() {
        let cfg = FanOutConfig::default();
        assert_eq!(cfg.max_concurrency, 4);
        assert_eq!(cfg.deadline_ms, 20_000);
        assert_eq!(cfg.web_limit, 6);
    }

    #[test]
    fn listing_filters_skip_empty_values() {
        let cfg = ListingConfig {
            date_from: "202501010000".into(),
            date_to: String::new(),
            inqry_div: "1".into(),
            ..ListingConfig::default()
        };
        let filters = cfg.filters();
        assert_eq!(filters.get("inqryBgnDt"), Some(&json!("202501010000")));
        assert!(!filters.contains_key("inqryEndDt"));
        assert_eq!(filters.get("inqryDiv"), Some(&json!("1")));
    }
}
