//! Site-wide statistics over every question and tag.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ccube_core::scoring::{one_decimal, stats_trending_score};
use ccube_core::{Clock, QaError, Result, Tag, TrendingQuestion};
use ccube_store::QaStore;

use crate::tags::{sort_by_popularity, TOP_TAGS};

/// Window for `recent_activity`.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Number of trending questions reported.
pub const TRENDING_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub total_questions: usize,
    pub total_answers: i64,
    pub total_votes: i64,
    pub total_views: i64,
    pub total_tags: usize,
    /// Answers per hundred questions, one decimal.
    pub answer_rate: String,
}

/// How many questions carry a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    pub period_days: i64,
    pub new_questions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engagement {
    pub avg_votes_per_question: String,
    pub avg_views_per_question: String,
    pub avg_answers_per_question: String,
}

/// The `/stats` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteStats {
    pub overview: Overview,
    /// Tag usage across questions, most used first.
    pub categories: Vec<TagUsage>,
    pub popular_tags: Vec<Tag>,
    pub trending_questions: Vec<TrendingQuestion>,
    pub recent_activity: RecentActivity,
    pub engagement: Engagement,
}

/// Computes [`SiteStats`].
#[derive(Clone)]
pub struct StatsAggregator {
    store: QaStore,
    clock: Arc<dyn Clock>,
}

impl StatsAggregator {
    pub fn new(store: QaStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Compute statistics from the current store contents.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::NotFound`] if the question index is absent, or an
    /// internal error if a question file cannot be read or parsed.
    pub fn site_stats(&self) -> Result<SiteStats> {
        let questions = self.store.load_questions()?;
        let now = self.clock.now();
        let window_start = now - Duration::days(RECENT_WINDOW_DAYS);

        let mut total_answers = 0i64;
        let mut total_votes = 0i64;
        let mut total_views = 0i64;
        let mut tag_usage: HashMap<&str, usize> = HashMap::new();
        let mut new_questions = 0usize;
        for q in &questions {
            total_answers = total_answers.saturating_add(q.answer_count);
            total_votes = total_votes.saturating_add(q.votes);
            total_views = total_views.saturating_add(q.views);
            for tag in &q.tags {
                *tag_usage.entry(tag.as_str()).or_insert(0) += 1;
            }
            if q.created_at.is_some_and(|c| c >= window_start) {
                new_questions += 1;
            }
        }

        let mut categories: Vec<TagUsage> = tag_usage
            .into_iter()
            .map(|(name, count)| TagUsage {
                name: name.to_string(),
                count,
            })
            .collect();
        categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        let mut tags = match self.store.read_tags() {
            Ok(tags) => tags,
            Err(QaError::NotFound(_)) => {
                debug!("no tags directory, reporting zero tags");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let total_tags = tags.len();
        sort_by_popularity(&mut tags);
        tags.truncate(TOP_TAGS);

        let mut trending: Vec<TrendingQuestion> = questions
            .iter()
            .filter(|q| q.is_trending)
            .map(|q| TrendingQuestion {
                id: q.id.clone(),
                title: q.title.clone(),
                tags: q.tags.clone(),
                votes: q.votes,
                views: q.views,
                answer_count: q.answer_count,
                trending_score: stats_trending_score(q),
            })
            .collect();
        trending.sort_by(|a, b| {
            b.trending_score
                .partial_cmp(&a.trending_score)
                .unwrap_or(Ordering::Equal)
        });
        trending.truncate(TRENDING_LIMIT);

        let total_questions = questions.len();
        let per_question = |total: i64| {
            if total_questions == 0 {
                0.0
            } else {
                total as f64 / total_questions as f64
            }
        };

        Ok(SiteStats {
            overview: Overview {
                total_questions,
                total_answers,
                total_votes,
                total_views,
                total_tags,
                answer_rate: one_decimal(per_question(total_answers) * 100.0),
            },
            categories,
            popular_tags: tags,
            trending_questions: trending,
            recent_activity: RecentActivity {
                period_days: RECENT_WINDOW_DAYS,
                new_questions,
            },
            engagement: Engagement {
                avg_votes_per_question: one_decimal(per_question(total_votes)),
                avg_views_per_question: one_decimal(per_question(total_views)),
                avg_answers_per_question: one_decimal(per_question(total_answers)),
            },
        })
    }
}
