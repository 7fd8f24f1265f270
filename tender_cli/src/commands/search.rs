use std::sync::Arc;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use tender_core::{
    FanOutConfig, FanOutEngine, ProfileLookup, RetrievalPlan, SourceAdapter, Summarizer,
    TavilyExtract, TavilySearch, YahooQuotes,
};

use crate::cli::Cli;
use crate::commands::{http_client, Result};
use crate::output::render_report;

const LEAD_CHARS: usize = 500;

/// Falls back to the leading portion of the extracted text when no LLM
/// summarizer is wired in.
struct LeadSummarizer;

#[async_trait]
impl Summarizer for LeadSummarizer {
    async fn summarize(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut end = LEAD_CHARS.min(trimmed.len());
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        Some(trimmed[..end].to_string())
    }
}

pub async fn run(
    cli: &Cli,
    query: &str,
    tickers: &[String],
    keywords: &[String],
    no_web: bool,
    limit: u32,
) -> Result<()> {
    let client = http_client()?;

    let spinner = if cli.output == crate::cli::OutputFormat::Pretty {
        let s = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            s.set_style(style);
        }
        s.set_message(format!("Searching for '{query}'..."));
        s.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(s)
    } else {
        None
    };

    let web: Arc<dyn SourceAdapter> = Arc::new(TavilySearch::new(client.clone(), None));
    let quotes: Arc<dyn SourceAdapter> = Arc::new(YahooQuotes::new(client.clone()));
    let profile = Arc::new(ProfileLookup::new(
        web.clone(),
        Arc::new(TavilyExtract::new(client, None)),
        Arc::new(LeadSummarizer),
    ));

    let config = FanOutConfig {
        web_limit: limit,
        ..FanOutConfig::default()
    };
    let mut engine = FanOutEngine::new(config)
        .with_quotes(quotes)
        .with_profile(profile);
    if !no_web {
        engine = engine.with_web(web);
    }

    let mut plan = RetrievalPlan::new(query);
    if !no_web {
        plan = plan.with_web(keywords.to_vec());
    }
    if !tickers.is_empty() {
        plan = plan.with_stocks(tickers.to_vec());
    }
    plan = plan.detect_profile();

    let report = engine.run(&plan).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    tracing::debug!(
        items = report.items.len(),
        quotes = report.quotes.len(),
        errors = report.errors.len(),
        "fan-out run finished"
    );
    render_report(cli, &report)
}
