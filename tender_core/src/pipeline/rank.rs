//! Relevance ranking: deadline urgency (50%), keyword match (30%),
//! source trust (20%).
//!
//! Sort order: nearest deadline first (missing deadlines last), then
//! composite score, then trust. Trust appears both inside the composite
//! score and as the tie-breaker; that double-weighting is observed
//! upstream behavior and is kept as-is.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::CanonicalItem;

pub const DEADLINE_WEIGHT: f64 = 0.5;
pub const KEYWORD_WEIGHT: f64 = 0.3;
pub const TRUST_WEIGHT: f64 = 0.2;

/// Trust for sources absent from the table.
pub const DEFAULT_TRUST: f64 = 0.5;

/// Sort sentinel for items without a parseable close date; large enough
/// that they order after every item with one.
const NO_DEADLINE_DAYS: i64 = 9999;

/// Horizon beyond which a deadline no longer adds urgency.
const DEADLINE_HORIZON_DAYS: i64 = 30;

/// Credibility weight per known source identity.
static TRUST: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("nipa", 1.0),
        ("bizinfo", 0.9),
        ("pps.data.go.kr", 0.9),
        ("web", 0.6),
    ])
});

/// Word tokens across scripts: any run of letters or digits.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

fn days_until(close_date: &str, today: NaiveDate) -> i64 {
    if close_date.is_empty() {
        return NO_DEADLINE_DAYS;
    }
    match NaiveDate::parse_from_str(close_date, "%Y-%m-%d") {
        Ok(d) => (d - today).num_days(),
        Err(_) => NO_DEADLINE_DAYS,
    }
}

/// Urgency in [0, 1]: due or overdue scores 1.0, a month out scores 0.0,
/// linear in between. No close date means indefinitely far away.
pub fn deadline_score(close_date: &str, today: NaiveDate) -> f64 {
    let days = days_until(close_date, today);
    if days >= DEADLINE_HORIZON_DAYS {
        0.0
    } else if days <= 0 {
        1.0
    } else {
        1.0 - days as f64 / DEADLINE_HORIZON_DAYS as f64
    }
}

/// Case-insensitive token match: a title hit counts double a snippet hit.
/// Normalized by the best possible total and clamped to 1.0.
pub fn keyword_score(query: &str, title: &str, snippet: &str) -> f64 {
    let q = query.to_lowercase();
    let tokens: Vec<&str> = TOKEN_RE.find_iter(&q).map(|m| m.as_str()).collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let t = title.to_lowercase();
    let s = snippet.to_lowercase();
    let mut hits = 0.0;
    for tok in &tokens {
        if t.contains(tok) {
            hits += 2.0;
        } else if s.contains(tok) {
            hits += 1.0;
        }
    }
    (hits / (2.0 * tokens.len() as f64)).min(1.0)
}

pub fn trust_score(source: &str) -> f64 {
    TRUST
        .get(source.to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_TRUST)
}

fn composite_score(item: &CanonicalItem, query: &str, today: NaiveDate) -> f64 {
    let score = DEADLINE_WEIGHT * deadline_score(&item.close_date, today)
        + KEYWORD_WEIGHT * keyword_score(query, &item.title, &item.snippet)
        + TRUST_WEIGHT * trust_score(&item.source);
    (score * 10_000.0).round() / 10_000.0
}

/// Rank against the current local date.
pub fn rank(items: Vec<CanonicalItem>, query: &str) -> Vec<CanonicalItem> {
    rank_as_of(items, query, Local::now().date_naive())
}

/// Rank against a pinned reference date. Fully deterministic for fixed
/// inputs: the sort is stable and every key derives from item fields
/// alone, so ties keep their pre-sort relative order.
pub fn rank_as_of(
    mut items: Vec<CanonicalItem>,
    query: &str,
    today: NaiveDate,
) -> Vec<CanonicalItem> {
    for item in &mut items {
        item.score = composite_score(item, query, today);
    }
    items.sort_by(|a, b| {
        days_until(&a.close_date, today)
            .cmp(&days_until(&b.close_date, today))
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
            .then_with(|| {
                trust_score(&b.source)
                    .partial_cmp(&trust_score(&a.source))
                    .unwrap_or(Ordering::Equal)
            })
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn item(title: &str, url: &str, source: &str, close: &str, snippet: &str) -> CanonicalItem {
        CanonicalItem {
            title: title.to_string(),
            url: (!url.is_empty()).then(|| url.to_string()),
            source: source.to_string(),
            agency: String::new(),
            announce_date: String::new(),
            close_date: close.to_string(),
            budget: String::new(),
            snippet: snippet.to_string(),
            attachments: Vec::new(),
            content_type: "notice".to_string(),
            score: 0.0,
        }
    }

    #[test]
    fn deadline_score_boundaries() {
        let today = pinned_today();
        assert_eq!(deadline_score("2025-06-01", today), 1.0);
        assert_eq!(deadline_score("2025-05-20", today), 1.0); // overdue
        assert_eq!(deadline_score("2025-07-01", today), 0.0); // +30 days
        assert!((deadline_score("2025-06-16", today) - 0.5).abs() < 1e-6); // +15 days
        assert_eq!(deadline_score("", today), 0.0);
        assert_eq!(deadline_score("not-a-date", today), 0.0);
    }

    #[test]
    fn keyword_score_title_and_snippet() {
        // Both tokens in the title: (2 + 2) / (2 * 2) = 1.0
        assert_eq!(
            keyword_score("AI healthcare", "AI for healthcare funding", ""),
            1.0
        );
        // Neither token anywhere, not even as a substring.
        assert_eq!(keyword_score("AI healthcare", "bridge work", ""), 0.0);
        // Matching is by substring, not word boundary: "repair" contains "ai".
        assert_eq!(keyword_score("AI", "road repair", ""), 1.0);
        // One token in the title, one in the snippet: (2 + 1) / 4 = 0.75
        assert!((keyword_score("AI healthcare", "AI grant", "for healthcare") - 0.75).abs() < 1e-9);
        // Empty query tokenizes to nothing.
        assert_eq!(keyword_score("  ", "AI", "AI"), 0.0);
    }

    #[test]
    fn keyword_score_mixed_scripts() {
        assert!(keyword_score("인공지능 과제", "인공지능 바우처 과제 공고", "") > 0.9);
    }

    #[test]
    fn trust_table_lookup() {
        assert_eq!(trust_score("nipa"), 1.0);
        assert_eq!(trust_score("NIPA"), 1.0);
        assert_eq!(trust_score("bizinfo"), 0.9);
        assert_eq!(trust_score("web"), 0.6);
        assert_eq!(trust_score("somewhere-else"), DEFAULT_TRUST);
    }

    #[test]
    fn missing_deadline_sorts_last() {
        let today = pinned_today();
        let ranked = rank_as_of(
            vec![
                item("no deadline", "u1", "nipa", "", ""),
                item("due soon", "u2", "web", "2025-06-05", ""),
                item("due later", "u3", "web", "2025-06-20", ""),
            ],
            "query",
            today,
        );
        assert_eq!(ranked[0].title, "due soon");
        assert_eq!(ranked[1].title, "due later");
        assert_eq!(ranked[2].title, "no deadline");
    }

    #[test]
    fn scores_are_in_unit_range() {
        let today = pinned_today();
        let ranked = rank_as_of(
            vec![
                item("AI healthcare notice", "u1", "nipa", "2025-06-01", "AI healthcare"),
                item("unrelated", "u2", "unknown-src", "", ""),
            ],
            "AI healthcare",
            today,
        );
        for it in &ranked {
            assert!((0.0..=1.0).contains(&it.score), "score {}", it.score);
        }
        // Best case: deadline 1.0, keyword 1.0, trust 1.0.
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn ranking_is_deterministic() {
        let today = pinned_today();
        let items = vec![
            item("A", "u1", "web", "2025-06-10", "alpha"),
            item("B", "u2", "nipa", "2025-06-10", "beta"),
            item("C", "u3", "bizinfo", "", "gamma"),
            item("D", "u4", "web", "2025-06-03", ""),
        ];
        let first = rank_as_of(items.clone(), "alpha beta", today);
        let second = rank_as_of(items, "alpha beta", today);
        let order = |v: &[CanonicalItem]| v.iter().map(|i| i.title.clone()).collect::<Vec<_>>();
        assert_eq!(order(&first), order(&second));
    }

    #[test]
    fn full_ties_keep_input_order() {
        let today = pinned_today();
        let ranked = rank_as_of(
            vec![
                item("first", "u1", "web", "2025-06-10", ""),
                item("second", "u2", "web", "2025-06-10", ""),
            ],
            "",
            today,
        );
        assert_eq!(ranked[0].title, "first");
        assert_eq!(ranked[1].title, "second");
    }

    #[test]
    fn trust_breaks_same_day_score_ties() {
        let today = pinned_today();
        // Same deadline and same keyword miss; nipa outranks web on the
        // composite score already, so check the explicit tertiary key with
        // sources whose trust differs but scores collide after rounding.
        let ranked = rank_as_of(
            vec![
                item("low trust", "u1", "web", "2025-06-10", ""),
                item("high trust", "u2", "nipa", "2025-06-10", ""),
            ],
            "",
            today,
        );
        assert_eq!(ranked[0].title, "high trust");
    }
}
