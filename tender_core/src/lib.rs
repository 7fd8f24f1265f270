// src/lib.rs
pub mod adapters;
pub mod config;
pub mod error;
pub mod fanout;
pub mod pagination;
pub mod pipeline;
pub mod plan;

pub use adapters::listing::PpsListing;
pub use adapters::profile::{
    looks_like_ticker, ContentExtractor, NullSummarizer, ProfileLookup, Summarizer, TavilyExtract,
};
pub use adapters::quotes::{normalize_symbol, YahooQuotes};
pub use adapters::web_search::TavilySearch;
pub use adapters::{FetchParams, RawRecord, SourceAdapter};
pub use config::{FanOutConfig, ListingConfig};
pub use error::AdapterError;
pub use fanout::{FanOutEngine, ProfileSummary, Quote, RetrievalReport, SourceError};
pub use pagination::{fetch_all_pages, find_notices};
pub use pipeline::{
    dedupe, normalize, normalize_all, rank, rank_as_of, Attachment, CanonicalItem, RankedList,
    TITLE_PLACEHOLDER,
};
pub use plan::RetrievalPlan;
