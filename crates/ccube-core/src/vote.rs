//! Vote records and their public projection.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QaError;

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Up,
    Down,
}

impl VoteType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// What a vote list is attached to. Selects the `votes/` subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteTarget {
    Question,
    Answer,
}

impl VoteTarget {
    /// Directory name under `votes/`.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Question => "questions",
            Self::Answer => "answers",
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question => f.write_str("question"),
            Self::Answer => f.write_str("answer"),
        }
    }
}

impl FromStr for VoteTarget {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(Self::Question),
            "answer" => Ok(Self::Answer),
            "" => Err(QaError::InvalidArgument("type is required".to_string())),
            other => Err(QaError::InvalidArgument(format!(
                "type must be 'question' or 'answer', got '{other}'"
            ))),
        }
    }
}

/// A single stored vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: String,
    #[serde(default, alias = "voter_address")]
    pub voter_wallet: String,
    #[serde(default)]
    pub voter_name: String,
    pub vote_type: VoteType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_reputation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The stable public shape of a vote returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteView {
    pub id: String,
    pub voter_wallet: String,
    pub voter_name: String,
    pub vote_type: VoteType,
    pub created_at: Option<DateTime<Utc>>,
    pub vote_weight: u32,
}

impl From<&Vote> for VoteView {
    fn from(v: &Vote) -> Self {
        Self {
            id: v.id.clone(),
            voter_wallet: v.voter_wallet.clone(),
            voter_name: v.voter_name.clone(),
            vote_type: v.vote_type,
            created_at: v.created_at,
            vote_weight: v.vote_weight.unwrap_or(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_target_parses_only_two_values() {
        assert_eq!("question".parse::<VoteTarget>().unwrap(), VoteTarget::Question);
        assert_eq!("answer".parse::<VoteTarget>().unwrap(), VoteTarget::Answer);
        assert!(matches!(
            "comment".parse::<VoteTarget>(),
            Err(QaError::InvalidArgument(_))
        ));
        assert!(matches!(
            "".parse::<VoteTarget>(),
            Err(QaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn projection_defaults_weight_to_one() {
        let v: Vote = serde_json::from_str(
            r#"{"id":"v1","voter_address":"0xabc","voter_name":"ana","vote_type":"down"}"#,
        )
        .unwrap();
        let view = VoteView::from(&v);
        assert_eq!(view.voter_wallet, "0xabc");
        assert_eq!(view.vote_type, VoteType::Down);
        assert_eq!(view.vote_weight, 1);
    }

    #[test]
    fn unknown_vote_type_fails_to_parse() {
        let res = serde_json::from_str::<Vote>(r#"{"id":"v1","vote_type":"sideways"}"#);
        assert!(res.is_err());
    }
}
