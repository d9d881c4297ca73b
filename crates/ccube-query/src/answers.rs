//! Answer aggregation for a single question.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ccube_core::error::validate_id;
use ccube_core::{Answer, AnswerSource, AnswerStatistics, Result};
use ccube_store::QaStore;

/// All answers for a question with summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerListing {
    pub question_id: String,
    pub answers: Vec<Answer>,
    pub statistics: AnswerStatistics,
    pub source: AnswerSource,
}

/// Collects and orders the answers to a question.
#[derive(Debug, Clone)]
pub struct AnswerAggregator {
    store: QaStore,
}

impl AnswerAggregator {
    #[must_use]
    pub fn new(store: QaStore) -> Self {
        Self { store }
    }

    /// Answers for `question_id`.
    ///
    /// A matching comprehensive bundle is returned as stored and the
    /// per-question directory is never read. Otherwise the directory's
    /// answers are summarized and ordered: accepted first, then by effective
    /// vote score descending, then oldest first with undated answers last.
    /// A question with no answer
    /// directory has no answers.
    ///
    /// # Errors
    ///
    /// Returns [`ccube_core::QaError::InvalidArgument`] for a bad id, or an
    /// internal error if any answer file cannot be read or parsed.
    pub fn answers_for(&self, question_id: &str) -> Result<AnswerListing> {
        validate_id("question id", question_id)?;

        if let Some(bundle) = self.store.find_comprehensive_bundle(question_id)? {
            return Ok(AnswerListing {
                question_id: question_id.to_string(),
                answers: bundle.answers,
                statistics: bundle.statistics,
                source: AnswerSource::Comprehensive,
            });
        }

        let Some(mut answers) = self.store.read_answers(question_id)? else {
            debug!(question_id, "no answer directory");
            return Ok(AnswerListing {
                question_id: question_id.to_string(),
                answers: Vec::new(),
                statistics: AnswerStatistics::default(),
                source: AnswerSource::Individual,
            });
        };

        let mut statistics = AnswerStatistics {
            total_answers: answers.len() as i64,
            ..AnswerStatistics::default()
        };
        for answer in &answers {
            statistics.total_votes = statistics.total_votes.saturating_add(answer.vote_score());
            if answer.is_accepted {
                statistics.accepted_answers += 1;
            }
        }

        answers.sort_by(|a, b| {
            b.is_accepted
                .cmp(&a.is_accepted)
                .then_with(|| b.vote_score().cmp(&a.vote_score()))
                .then_with(|| oldest_first(a, b))
        });

        Ok(AnswerListing {
            question_id: question_id.to_string(),
            answers,
            statistics,
            source: AnswerSource::Individual,
        })
    }
}

fn oldest_first(a: &Answer, b: &Answer) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
