//! Vote aggregation for a question or answer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ccube_core::error::validate_id;
use ccube_core::{QaError, Result, Vote, VoteTarget, VoteType, VoteView};
use ccube_store::QaStore;

/// Number of votes in `recent_votes`.
pub const RECENT_VOTES: usize = 10;

/// Reputation tier used when a voter has none recorded.
pub const UNKNOWN_REPUTATION: &str = "unknown";

/// Up/down tally within one reputation tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationTally {
    pub upvotes: usize,
    pub downvotes: usize,
}

/// Derived view of a vote list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteSummary {
    pub total_votes: usize,
    pub upvotes: usize,
    pub downvotes: usize,
    pub score: i64,
    pub reputation_breakdown: BTreeMap<String, ReputationTally>,
    pub recent_votes: Vec<VoteView>,
}

impl VoteSummary {
    /// Summarize a vote list. Each vote counts once regardless of weight.
    #[must_use]
    pub fn from_votes(votes: &[Vote]) -> Self {
        let mut summary = Self {
            total_votes: votes.len(),
            ..Self::default()
        };
        for vote in votes {
            let tier = vote
                .voter_reputation
                .clone()
                .unwrap_or_else(|| UNKNOWN_REPUTATION.to_string());
            let tally = summary.reputation_breakdown.entry(tier).or_default();
            match vote.vote_type {
                VoteType::Up => {
                    summary.upvotes += 1;
                    tally.upvotes += 1;
                }
                VoteType::Down => {
                    summary.downvotes += 1;
                    tally.downvotes += 1;
                }
            }
        }
        summary.score = summary.upvotes as i64 - summary.downvotes as i64;

        let mut recent: Vec<&Vote> = votes.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summary.recent_votes = recent
            .into_iter()
            .take(RECENT_VOTES)
            .map(VoteView::from)
            .collect();
        summary
    }
}

/// Votes attached to one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteListing {
    pub target_type: VoteTarget,
    pub target_id: String,
    pub votes: Vec<VoteView>,
    pub summary: VoteSummary,
}

/// Validate raw `type` and `id` request parameters.
///
/// # Errors
///
/// Returns [`QaError::InvalidArgument`] if either is missing, the type is
/// not `question` or `answer`, or the id is path-like.
pub fn parse_target(target: Option<&str>, id: Option<&str>) -> Result<(VoteTarget, String)> {
    let target = target
        .filter(|t| !t.is_empty())
        .ok_or_else(|| QaError::InvalidArgument("type is required".to_string()))?;
    let id = id
        .filter(|i| !i.is_empty())
        .ok_or_else(|| QaError::InvalidArgument("id is required".to_string()))?;
    let target: VoteTarget = target.parse()?;
    validate_id("id", id)?;
    Ok((target, id.to_string()))
}

/// Reads vote lists and summarizes them.
#[derive(Debug, Clone)]
pub struct VoteAggregator {
    store: QaStore,
}

impl VoteAggregator {
    #[must_use]
    pub fn new(store: QaStore) -> Self {
        Self { store }
    }

    /// Votes on one question or answer. A target with no vote file has an
    /// empty list and a zeroed summary.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::InvalidArgument`] for a bad id, or an internal
    /// error if the vote file cannot be read or parsed.
    pub fn votes_for(&self, target: VoteTarget, id: &str) -> Result<VoteListing> {
        validate_id("id", id)?;
        let votes = self.store.read_votes(target, id)?.unwrap_or_default();
        let summary = VoteSummary::from_votes(&votes);
        Ok(VoteListing {
            target_type: target,
            target_id: id.to_string(),
            votes: votes.iter().map(VoteView::from).collect(),
            summary,
        })
    }
}
