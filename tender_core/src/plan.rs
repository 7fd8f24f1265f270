//! Immutable per-query retrieval plan.

use crate::adapters::profile::looks_like_ticker;

/// Query substrings that indicate a company question.
const PROFILE_KEYWORDS: &[&str] = &["기업", "회사", "profile"];

/// What a single fan-out run should fetch. Constructed once per incoming
/// query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetrievalPlan {
    pub query: String,
    pub do_web: bool,
    pub do_stocks: bool,
    pub do_profile: bool,
    pub web_keywords: Vec<String>,
    pub tickers: Vec<String>,
}

impl RetrievalPlan {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Enable web search. Keywords replace the raw query as the search
    /// string when non-empty.
    pub fn with_web(mut self, keywords: Vec<String>) -> Self {
        self.do_web = true;
        self.web_keywords = keywords;
        self
    }

    pub fn with_stocks(mut self, tickers: Vec<String>) -> Self {
        self.do_stocks = true;
        self.tickers = tickers;
        self
    }

    pub fn with_profile(mut self) -> Self {
        self.do_profile = true;
        self
    }

    /// Enable the profile capability when the query looks like a bare
    /// ticker, asks about a company outright, or tickers were requested
    /// explicitly.
    pub fn detect_profile(mut self) -> Self {
        let q = self.query.to_lowercase();
        self.do_profile = looks_like_ticker(&self.query)
            || !self.tickers.is_empty()
            || PROFILE_KEYWORDS.iter().any(|k| q.contains(k));
        self
    }

    /// Whether no capability is enabled at all.
    pub fn is_empty(&self) -> bool {
        !(self.do_web || self.do_stocks || self.do_profile)
    }
}
