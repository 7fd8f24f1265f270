//! Shared normalization → deduplication → ranking pipeline.
//!
//! Both retrieval paths feed this: the paginated listing path end to end,
//! and the web task of a fan-out run. Quote and profile results skip it —
//! they are not comparable documents.

mod dedupe;
mod normalize;
mod rank;
mod types;

pub use dedupe::dedupe;
pub use normalize::{normalize, normalize_all, to_iso_date};
pub use rank::{
    deadline_score, keyword_score, rank, rank_as_of, trust_score, DEADLINE_WEIGHT, DEFAULT_TRUST,
    KEYWORD_WEIGHT, TRUST_WEIGHT,
};
pub use types::{Attachment, CanonicalItem, RankedList, TITLE_PLACEHOLDER};
