//! Concurrent fan-out/join across the enabled live sources.
//!
//! One task per enabled capability, run on a bounded pool under a single
//! outer deadline, collected in completion order. No task failure aborts
//! the run and no ordering is guaranteed between source tasks; the final
//! item order comes from the ranking engine alone.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::json;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use super::types::{Quote, ResultBag, RetrievalReport, SourceError};
use crate::adapters::profile::ProfileLookup;
use crate::adapters::{FetchParams, RawRecord, SourceAdapter};
use crate::config::FanOutConfig;
use crate::fanout::ProfileSummary;
use crate::pipeline::{dedupe, normalize_all, rank};
use crate::plan::RetrievalPlan;

const WEB_LABEL: &str = "web";
const QUOTES_LABEL: &str = "quotes";
const PROFILE_LABEL: &str = "profile";

enum TaskOutput {
    Web(Vec<RawRecord>),
    Quotes(Vec<RawRecord>),
    Profile(ProfileSummary),
}

type TaskResult = (&'static str, Result<TaskOutput, (String, bool)>);

pub struct FanOutEngine {
    web: Option<Arc<dyn SourceAdapter>>,
    quotes: Option<Arc<dyn SourceAdapter>>,
    profile: Option<Arc<ProfileLookup>>,
    config: FanOutConfig,
}

impl FanOutEngine {
    pub fn new(config: FanOutConfig) -> Self {
        Self {
            web: None,
            quotes: None,
            profile: None,
            config,
        }
    }

    pub fn with_web(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.web = Some(adapter);
        self
    }

    pub fn with_quotes(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.quotes = Some(adapter);
        self
    }

    pub fn with_profile(mut self, lookup: Arc<ProfileLookup>) -> Self {
        self.profile = Some(lookup);
        self
    }

    /// Execute the plan. Partial failure is recorded per label, never
    /// propagated; this function cannot fail. A run with zero enabled
    /// capabilities returns an empty result with one error entry.
    pub async fn run(&self, plan: &RetrievalPlan) -> RetrievalReport {
        let start = Instant::now();
        let pool = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut bag = ResultBag::default();

        let mut tasks: FuturesUnordered<BoxFuture<'static, TaskResult>> = FuturesUnordered::new();
        let mut pending: Vec<&'static str> = Vec::new();

        if plan.do_web {
            match self.web.clone() {
                Some(adapter) => {
                    let pool = Arc::clone(&pool);
                    let query = if plan.web_keywords.is_empty() {
                        plan.query.clone()
                    } else {
                        plan.web_keywords.join(" ")
                    };
                    let limit = self.config.web_limit;
                    pending.push(WEB_LABEL);
                    tasks.push(Box::pin(async move {
                        let _permit = pool.acquire_owned().await.ok();
                        let params = FetchParams::query(query).with_limit(limit);
                        let out = adapter
                            .fetch(&params)
                            .await
                            .map(TaskOutput::Web)
                            .map_err(|e| (e.to_string(), e.is_timeout()));
                        (WEB_LABEL, out)
                    }));
                }
                None => bag.errors.push(SourceError {
                    source: WEB_LABEL.into(),
                    error: "no web adapter configured".into(),
                    is_timeout: false,
                }),
            }
        }

        if plan.do_stocks && !plan.tickers.is_empty() {
            match self.quotes.clone() {
                Some(adapter) => {
                    let pool = Arc::clone(&pool);
                    let tickers = plan.tickers.clone();
                    pending.push(QUOTES_LABEL);
                    tasks.push(Box::pin(async move {
                        let _permit = pool.acquire_owned().await.ok();
                        let params = FetchParams::query(tickers.join(","))
                            .with_filter("symbols", json!(tickers));
                        let out = adapter
                            .fetch(&params)
                            .await
                            .map(TaskOutput::Quotes)
                            .map_err(|e| (e.to_string(), e.is_timeout()));
                        (QUOTES_LABEL, out)
                    }));
                }
                None => bag.errors.push(SourceError {
                    source: QUOTES_LABEL.into(),
                    error: "no quote adapter configured".into(),
                    is_timeout: false,
                }),
            }
        }

        if plan.do_profile {
            match self.profile.clone() {
                Some(lookup) => {
                    let pool = Arc::clone(&pool);
                    let query = plan.query.clone();
                    pending.push(PROFILE_LABEL);
                    tasks.push(Box::pin(async move {
                        let _permit = pool.acquire_owned().await.ok();
                        let out = lookup
                            .lookup(&query)
                            .await
                            .map(TaskOutput::Profile)
                            .map_err(|e| (e.to_string(), e.is_timeout()));
                        (PROFILE_LABEL, out)
                    }));
                }
                None => bag.errors.push(SourceError {
                    source: PROFILE_LABEL.into(),
                    error: "no profile lookup configured".into(),
                    is_timeout: false,
                }),
            }
        }

        if pending.is_empty() && bag.errors.is_empty() {
            // Nothing enabled at all: an empty successful result, flagged.
            bag.errors.push(SourceError {
                source: "plan".into(),
                error: "no retrieval capability enabled".into(),
                is_timeout: false,
            });
        }

        // Join in completion order under one outer deadline.
        let deadline = Duration::from_millis(self.config.deadline_ms);
        let joined = timeout(deadline, async {
            while let Some((label, result)) = tasks.next().await {
                pending.retain(|l| *l != label);
                match result {
                    Ok(TaskOutput::Web(records)) => bag.web = Some(records),
                    Ok(TaskOutput::Quotes(records)) => {
                        bag.quotes = Some(Quote::from_records(&records))
                    }
                    Ok(TaskOutput::Profile(profile)) => bag.profile = Some(profile),
                    Err((error, is_timeout)) => {
                        tracing::debug!(source = label, error = %error, "source task failed");
                        bag.errors.push(SourceError {
                            source: label.into(),
                            error,
                            is_timeout,
                        });
                    }
                }
            }
        })
        .await;

        if joined.is_err() {
            // Tasks still pending at the deadline are abandoned; late
            // results are discarded along with their futures.
            for label in &pending {
                bag.errors.push(SourceError {
                    source: label.to_string(),
                    error: format!("deadline of {}ms elapsed", self.config.deadline_ms),
                    is_timeout: true,
                });
            }
        }
        drop(tasks);

        let mut report = RetrievalReport::new(&plan.query);
        report.partial = !bag.errors.is_empty();
        report.errors = bag.errors;
        if let Some(records) = bag.web {
            let items = normalize_all(&records, WEB_LABEL, "web");
            report.items = rank(dedupe(items), &plan.query);
        }
        report.quotes = bag.quotes.unwrap_or_default();
        report.profile = bag.profile;
        report.duration_ms = Some(start.elapsed().as_millis() as u64);
        report
    }
}
