//! End-to-end tests for the fan-out engine and the pagination controller,
//! using scripted in-memory adapters (no network).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map};

use tender_core::{
    fetch_all_pages, find_notices, AdapterError, ContentExtractor, FanOutConfig, FanOutEngine,
    FetchParams, ListingConfig, ProfileLookup, RawRecord, RetrievalPlan, SourceAdapter, Summarizer,
};

/// Returns one scripted page per call, empty pages once the script runs out.
struct ScriptedAdapter {
    name: &'static str,
    pages: Vec<Vec<RawRecord>>,
    calls: AtomicUsize,
}

impl ScriptedAdapter {
    fn new(name: &'static str, pages: Vec<Vec<RawRecord>>) -> Self {
        Self {
            name,
            pages,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for ScriptedAdapter {
    fn name(&self) -> &'static str {
        self.name
    }
    fn description(&self) -> &'static str {
        "scripted test adapter"
    }
    async fn fetch(&self, _params: &FetchParams) -> Result<Vec<RawRecord>, AdapterError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.get(idx).cloned().unwrap_or_default())
    }
}

struct FailingAdapter;

#[async_trait]
impl SourceAdapter for FailingAdapter {
    fn name(&self) -> &'static str {
        "failing"
    }
    fn description(&self) -> &'static str {
        "always fails"
    }
    async fn fetch(&self, _params: &FetchParams) -> Result<Vec<RawRecord>, AdapterError> {
        Err(AdapterError::HttpStatus(503))
    }
}

struct SlowAdapter;

#[async_trait]
impl SourceAdapter for SlowAdapter {
    fn name(&self) -> &'static str {
        "slow"
    }
    fn description(&self) -> &'static str {
        "never completes in time"
    }
    async fn fetch(&self, _params: &FetchParams) -> Result<Vec<RawRecord>, AdapterError> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(Vec::new())
    }
}

struct StaticExtractor(&'static str);

#[async_trait]
impl ContentExtractor for StaticExtractor {
    async fn extract(&self, _urls: &[String]) -> Result<String, AdapterError> {
        Ok(self.0.to_string())
    }
}

struct EchoSummarizer;

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn summarize(&self, text: &str) -> Option<String> {
        Some(text.to_string())
    }
}

fn full_page(page_size: u32, page: u32) -> Vec<RawRecord> {
    (0..page_size)
        .map(|i| json!({ "title": format!("notice p{page} #{i}"), "url": format!("https://x/{page}/{i}") }))
        .collect()
}

// --- Pagination stop rules -------------------------------------------------

#[tokio::test]
async fn empty_first_page_stops_immediately() {
    let adapter = ScriptedAdapter::new("pps.data.go.kr", vec![vec![]]);
    let records = fetch_all_pages(&adapter, "q", 10, 3, &Map::new())
        .await
        .unwrap();
    assert!(records.is_empty());
    assert_eq!(adapter.call_count(), 1);
}

#[tokio::test]
async fn short_page_stops_after_accumulating() {
    let adapter = ScriptedAdapter::new(
        "pps.data.go.kr",
        vec![full_page(10, 1), full_page(4, 2), full_page(10, 3)],
    );
    let records = fetch_all_pages(&adapter, "q", 10, 3, &Map::new())
        .await
        .unwrap();
    assert_eq!(records.len(), 14);
    assert_eq!(adapter.call_count(), 2);
}

#[tokio::test]
async fn full_pages_run_to_the_cap() {
    let adapter = ScriptedAdapter::new(
        "pps.data.go.kr",
        vec![full_page(10, 1), full_page(10, 2), full_page(10, 3)],
    );
    let records = fetch_all_pages(&adapter, "q", 10, 3, &Map::new())
        .await
        .unwrap();
    assert_eq!(records.len(), 30);
    assert_eq!(adapter.call_count(), 3);
}

#[tokio::test]
async fn page_failure_is_terminal() {
    let adapter = FailingAdapter;
    let err = fetch_all_pages(&adapter, "q", 10, 3, &Map::new())
        .await
        .unwrap_err();
    assert_eq!(err.code_str(), "http_status");
}

// --- Listing pipeline ------------------------------------------------------

#[tokio::test]
async fn find_notices_normalizes_dedupes_and_ranks() {
    // A close date a few days out, so it carries a real deadline no matter
    // when the test runs.
    let close = (chrono::Local::now().date_naive() + chrono::Duration::days(10))
        .format("%Y%m%d")
        .to_string();
    let page = vec![
        json!({ "bidNtceNm": "AI 플랫폼 구축", "bidNtceDtlUrl": "https://g2b/1", "bidClseDt": close }),
        json!({ "bidNtceNm": "AI 플랫폼 구축", "bidNtceDtlUrl": "https://g2b/1", "bidClseDt": close }),
        json!({ "bidNtceNm": "도로 보수", "bidNtceDtlUrl": "https://g2b/2" }),
    ];
    let adapter = ScriptedAdapter::new("pps.data.go.kr", vec![page]);
    let ranked = find_notices(&adapter, "AI", &ListingConfig::default()).await;

    assert_eq!(ranked.items.len(), 2);
    assert!(ranked.errors.is_empty());
    // The dated item sorts before the one without a close date.
    assert_eq!(ranked.items[0].title, "AI 플랫폼 구축");
    assert_eq!(ranked.items[0].source, "pps.data.go.kr");
    assert_eq!(ranked.items[0].content_type, "notice");
}

#[tokio::test]
async fn find_notices_converts_failure_to_error_entry() {
    let ranked = find_notices(&FailingAdapter, "q", &ListingConfig::default()).await;
    assert!(ranked.items.is_empty());
    assert_eq!(ranked.errors.len(), 1);
    assert_eq!(ranked.errors[0].source, "failing");
    assert!(!ranked.errors[0].is_timeout);
}

// --- Fan-out orchestration -------------------------------------------------

fn profile_lookup() -> Arc<ProfileLookup> {
    let search: Arc<dyn SourceAdapter> = Arc::new(ScriptedAdapter::new(
        "web",
        vec![vec![
            json!({ "title": "About", "url": "https://corp.example/about" }),
            json!({ "title": "Wiki", "url": "https://wiki.example/corp" }),
        ]],
    ));
    Arc::new(ProfileLookup::new(
        search,
        Arc::new(StaticExtractor("Founded in 1969, the company makes chips.")),
        Arc::new(EchoSummarizer),
    ))
}

#[tokio::test]
async fn partial_failure_keeps_other_sources() {
    let web: Arc<dyn SourceAdapter> = Arc::new(ScriptedAdapter::new(
        "web",
        vec![vec![
            json!({ "title": "Samsung expands foundry", "url": "https://news/1", "content": "chips" }),
            json!({ "title": "KRX weekly", "url": "https://news/2" }),
        ]],
    ));
    let quotes: Arc<dyn SourceAdapter> = Arc::new(FailingAdapter);

    let engine = FanOutEngine::new(FanOutConfig::default())
        .with_web(web)
        .with_quotes(quotes)
        .with_profile(profile_lookup());

    let plan = RetrievalPlan::new("005930")
        .with_web(vec![])
        .with_stocks(vec!["005930".into()])
        .detect_profile();
    let report = engine.run(&plan).await;

    assert_eq!(report.items.len(), 2);
    let profile = report.profile.as_ref().expect("profile should complete");
    assert_eq!(profile.sources.len(), 2);
    assert!(profile.summary.contains("1969"));

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].source, "quotes");
    assert!(report.partial);
    assert!(!report.all_failed());
}

#[tokio::test]
async fn quote_records_pass_minimal_validation() {
    let quotes: Arc<dyn SourceAdapter> = Arc::new(ScriptedAdapter::new(
        "quotes",
        vec![vec![
            json!({ "symbol": "005930.KS", "price": 71000.0, "currency": "KRW" }),
            json!({ "symbol": "AAPL", "error": "upstream HTTP status 404" }),
        ]],
    ));
    let engine = FanOutEngine::new(FanOutConfig::default()).with_quotes(quotes);
    let plan = RetrievalPlan::new("quotes only").with_stocks(vec!["005930".into(), "AAPL".into()]);
    let report = engine.run(&plan).await;

    assert_eq!(report.quotes.len(), 2);
    assert_eq!(report.quotes[0].price, Some(71000.0));
    assert!(report.quotes[1].error.is_some());
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn zero_capabilities_is_success_with_error_entry() {
    let engine = FanOutEngine::new(FanOutConfig::default());
    let report = engine.run(&RetrievalPlan::new("nothing enabled")).await;

    assert!(report.items.is_empty());
    assert!(report.quotes.is_empty());
    assert!(report.profile.is_none());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].source, "plan");
}

#[tokio::test(start_paused = true)]
async fn deadline_abandons_pending_tasks() {
    let web: Arc<dyn SourceAdapter> = Arc::new(SlowAdapter);
    let quotes: Arc<dyn SourceAdapter> = Arc::new(ScriptedAdapter::new(
        "quotes",
        vec![vec![json!({ "symbol": "AAPL", "price": 1.0, "currency": "USD" })]],
    ));

    let config = FanOutConfig {
        deadline_ms: 100,
        ..FanOutConfig::default()
    };
    let engine = FanOutEngine::new(config).with_web(web).with_quotes(quotes);
    let plan = RetrievalPlan::new("AAPL")
        .with_web(vec![])
        .with_stocks(vec!["AAPL".into()]);
    let report = engine.run(&plan).await;

    // The quick task's results survive; the slow one is a labeled timeout.
    assert_eq!(report.quotes.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].source, "web");
    assert!(report.errors[0].is_timeout);
    assert!(report.partial);
}
