//! Fan-out/join retrieval across the live sources.
//!
//! This module provides:
//! - `RetrievalReport`: the merged, partially-failure-tolerant run output
//! - `FanOutEngine`: bounded parallel dispatch with one outer deadline
//!
//! # Example
//!
//! ```ignore
//! use tender_core::{FanOutEngine, FanOutConfig, RetrievalPlan};
//!
//! let engine = FanOutEngine::new(FanOutConfig::default())
//!     .with_web(web_adapter)
//!     .with_quotes(quote_adapter);
//! let plan = RetrievalPlan::new("삼성전자")
//!     .with_web(vec![])
//!     .with_stocks(vec!["005930".into()])
//!     .detect_profile();
//! let report = engine.run(&plan).await;
//! ```

mod engine;
mod types;

pub use engine::FanOutEngine;
pub use types::{ProfileSummary, Quote, RetrievalReport, SourceError};
