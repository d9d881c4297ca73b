//! Question type, the central record of the QA store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

/// A forum question, persisted as `questions/{id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    // === Identity ===
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,

    // === Counters (missing or null counters read as 0) ===
    #[serde(default, deserialize_with = "lenient::count")]
    pub votes: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub views: i64,
    #[serde(default, alias = "answers_count", deserialize_with = "lenient::count")]
    pub answer_count: i64,

    // === Activity ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_trending: bool,

    // === Fields this layer does not interpret (author, bounty, ...) ===
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Question {
    /// Create a bare question with zeroed counters.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            tags: Vec::new(),
            votes: 0,
            views: 0,
            answer_count: 0,
            created_at: None,
            last_activity: None,
            is_trending: false,
            extra: Map::new(),
        }
    }

    /// Case-insensitive substring match across title, content, and tags.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
            || self
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&needle))
    }

    /// A tag equals the category or contains it as a substring.
    #[must_use]
    pub fn matches_category(&self, category: &str) -> bool {
        self.tags
            .iter()
            .any(|t| t == category || t.contains(category))
    }
}

/// A question ranked as related to another by shared tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedQuestion {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub votes: i64,
    pub views: i64,
    pub answer_count: i64,
    pub common_tags: Vec<String>,
    pub similarity_score: f64,
}

/// A question flagged as trending, with its computed rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingQuestion {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub votes: i64,
    pub views: i64,
    pub answer_count: i64,
    pub trending_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_counters_deserialize_as_zero() {
        let q: Question = serde_json::from_str(r#"{"id":"q1","title":"Hi"}"#).unwrap();
        assert_eq!(q.votes, 0);
        assert_eq!(q.views, 0);
        assert_eq!(q.answer_count, 0);
        assert!(q.created_at.is_none());
        assert!(!q.is_trending);
    }

    #[test]
    fn null_and_float_counters_are_tolerated() {
        let q: Question =
            serde_json::from_str(r#"{"id":"q1","votes":null,"views":2.0,"answer_count":3}"#)
                .unwrap();
        assert_eq!(q.votes, 0);
        assert_eq!(q.views, 2);
        assert_eq!(q.answer_count, 3);
    }

    #[test]
    fn answers_count_alias_is_accepted() {
        let q: Question = serde_json::from_str(r#"{"id":"q1","answers_count":4}"#).unwrap();
        assert_eq!(q.answer_count, 4);
    }

    #[test]
    fn unknown_fields_survive_a_rewrite() {
        let raw = r#"{"id":"q1","title":"Hi","author":{"wallet":"0xabc"},"bounty":10}"#;
        let q: Question = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_value(&q).unwrap();
        assert_eq!(back["author"]["wallet"], "0xabc");
        assert_eq!(back["bounty"], 10);
    }

    #[test]
    fn search_covers_title_content_and_tags() {
        let mut q = Question::new("q1", "Deploying a BEP20 token");
        q.content = "Gas settings for testnet".to_string();
        q.tags = vec!["Solidity".to_string()];

        assert!(q.matches_search("bep20"));
        assert!(q.matches_search("TESTNET"));
        assert!(q.matches_search("solid"));
        assert!(!q.matches_search("react"));
    }

    #[test]
    fn category_matches_exact_or_substring_tag() {
        let mut q = Question::new("q1", "t");
        q.tags = vec!["defi-lending".to_string(), "bsc".to_string()];

        assert!(q.matches_category("bsc"));
        assert!(q.matches_category("defi"));
        assert!(!q.matches_category("nft"));
    }
}
