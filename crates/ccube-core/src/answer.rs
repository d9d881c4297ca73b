//! Answer types, including the two persisted vote representations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An answer's vote count as stored on disk: either a plain net count or a
/// split tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerVotes {
    Count(i64),
    Split {
        #[serde(default)]
        upvotes: i64,
        #[serde(default)]
        downvotes: i64,
    },
}

impl AnswerVotes {
    /// Net score regardless of representation.
    #[must_use]
    pub fn effective_score(&self) -> i64 {
        match *self {
            Self::Count(n) => n,
            Self::Split { upvotes, downvotes } => upvotes.saturating_sub(downvotes),
        }
    }
}

/// An answer, persisted as `answers/{question_id}/{answer_id}.json` or
/// inside a comprehensive bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<AnswerVotes>,
    #[serde(default, alias = "accepted")]
    pub is_accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Answer {
    /// Effective vote score; an answer without votes scores 0.
    #[must_use]
    pub fn vote_score(&self) -> i64 {
        self.votes.map_or(0, |v| v.effective_score())
    }
}

/// Summary statistics for a question's answers.
///
/// Bundles may carry statistics beyond the three computed here; those are
/// kept in `extra` and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerStatistics {
    #[serde(default)]
    pub total_answers: i64,
    #[serde(default)]
    pub total_votes: i64,
    #[serde(default)]
    pub accepted_answers: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A precomputed `*comprehensive*.json` file holding every answer for one
/// question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveBundle {
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub statistics: AnswerStatistics,
}

/// Where an answer listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Comprehensive,
    Individual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integer_votes_resolve_directly() {
        let a: Answer = serde_json::from_str(r#"{"id":"a1","votes":7}"#).unwrap();
        assert_eq!(a.votes, Some(AnswerVotes::Count(7)));
        assert_eq!(a.vote_score(), 7);
    }

    #[test]
    fn structured_votes_resolve_to_difference() {
        let a: Answer =
            serde_json::from_str(r#"{"id":"a1","votes":{"upvotes":5,"downvotes":2}}"#).unwrap();
        assert_eq!(a.vote_score(), 3);
    }

    #[test]
    fn extreme_split_votes_saturate() {
        let votes = AnswerVotes::Split {
            upvotes: i64::MIN,
            downvotes: 1,
        };
        assert_eq!(votes.effective_score(), i64::MIN);
    }

    #[test]
    fn absent_votes_score_zero() {
        let a: Answer = serde_json::from_str(r#"{"id":"a1"}"#).unwrap();
        assert_eq!(a.vote_score(), 0);
        assert!(!a.is_accepted);
    }

    #[test]
    fn accepted_alias_is_accepted() {
        let a: Answer = serde_json::from_str(r#"{"id":"a1","accepted":true}"#).unwrap();
        assert!(a.is_accepted);
    }

    #[test]
    fn bundle_statistics_keep_unknown_keys() {
        let raw = r#"{
            "answers": [{"id": "a1", "votes": 2}],
            "statistics": {"total_answers": 1, "total_votes": 2, "average_quality": 4.5}
        }"#;
        let bundle: ComprehensiveBundle = serde_json::from_str(raw).unwrap();
        assert_eq!(bundle.answers.len(), 1);
        assert_eq!(bundle.statistics.total_answers, 1);
        assert_eq!(bundle.statistics.accepted_answers, 0);
        assert_eq!(bundle.statistics.extra["average_quality"], 4.5);
    }
}
