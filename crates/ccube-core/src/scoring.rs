//! Ranking formulas shared by the aggregators.
//!
//! Each formula is a fixed linear combination; the weights are part of the
//! public contract of the read APIs.

use std::collections::HashSet;

use crate::question::Question;
use crate::tag::Tag;

/// Listing rank for `sort=trending`: votes 0.5, views 0.3, answers 0.2.
#[must_use]
pub fn listing_trending_score(q: &Question) -> f64 {
    q.votes as f64 * 0.5 + q.views as f64 * 0.3 + q.answer_count as f64 * 0.2
}

/// Site statistics rank for flagged trending questions: votes 0.4,
/// views 0.3, answers 0.3.
#[must_use]
pub fn stats_trending_score(q: &Question) -> f64 {
    q.votes as f64 * 0.4 + q.views as f64 * 0.3 + q.answer_count as f64 * 0.3
}

/// Popularity of a tag: question count 0.7, trending score 0.3.
#[must_use]
pub fn tag_popularity(tag: &Tag) -> f64 {
    tag.question_count as f64 * 0.7 + tag.trending_score * 0.3
}

/// Tags shared by both lists, in the order they appear in `target`.
#[must_use]
pub fn common_tags(target: &[String], candidate: &[String]) -> Vec<String> {
    let candidate: HashSet<&str> = candidate.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    target
        .iter()
        .filter(|t| candidate.contains(t.as_str()) && seen.insert(t.as_str()))
        .cloned()
        .collect()
}

/// Shared-tag similarity: `|common| / max(|target|, |candidate|)`.
#[must_use]
pub fn tag_similarity(common: usize, target_len: usize, candidate_len: usize) -> f64 {
    let denom = target_len.max(candidate_len);
    if denom == 0 {
        return 0.0;
    }
    common as f64 / denom as f64
}

/// Final rank of a related question: similarity 0.7, votes 0.3.
#[must_use]
pub fn related_rank(similarity: f64, votes: i64) -> f64 {
    similarity * 0.7 + votes as f64 * 0.3
}

/// Render a ratio with exactly one decimal place.
#[must_use]
pub fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}
