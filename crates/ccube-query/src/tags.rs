//! Tag listing with overview statistics.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use ccube_core::scoring::tag_popularity;
use ccube_core::{Result, Tag};
use ccube_store::QaStore;

/// Default number of tags returned.
pub const DEFAULT_TAG_LIMIT: usize = 50;

/// Size of the `top_tags` overview list.
pub const TOP_TAGS: usize = 10;

/// Filters and order for a tag listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagQuery {
    pub category: Option<String>,
    /// Order by popularity instead of name.
    pub popular: bool,
    pub limit: usize,
}

impl Default for TagQuery {
    fn default() -> Self {
        Self {
            category: None,
            popular: false,
            limit: DEFAULT_TAG_LIMIT,
        }
    }
}

/// Overview computed over every tag, independent of the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagStatistics {
    pub total_tags: usize,
    /// Sum of `question_count` across all tags.
    pub total_questions: i64,
    pub categories: Vec<String>,
    /// Ten tags with the highest raw `question_count`.
    pub top_tags: Vec<Tag>,
}

/// A tag listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagListing {
    pub tags: Vec<Tag>,
    pub statistics: TagStatistics,
    pub filters: TagQuery,
}

/// Sort tags by popularity (question count 0.7, trending 0.3), descending.
pub fn sort_by_popularity(tags: &mut [Tag]) {
    tags.sort_by(|a, b| {
        tag_popularity(b)
            .partial_cmp(&tag_popularity(a))
            .unwrap_or(Ordering::Equal)
    });
}

/// Lists tags from the store.
#[derive(Debug, Clone)]
pub struct TagAggregator {
    store: QaStore,
}

impl TagAggregator {
    #[must_use]
    pub fn new(store: QaStore) -> Self {
        Self { store }
    }

    /// Filter, order, and truncate tags, with an unfiltered overview.
    ///
    /// # Errors
    ///
    /// Returns [`ccube_core::QaError::NotFound`] if the tags directory does
    /// not exist.
    pub fn list(&self, query: &TagQuery) -> Result<TagListing> {
        let all = self.store.read_tags()?;
        let statistics = overview(&all);

        let category = query.category.as_deref().filter(|c| !c.is_empty());
        let mut tags: Vec<Tag> = match category {
            Some(category) => all
                .into_iter()
                .filter(|t| t.category.eq_ignore_ascii_case(category))
                .collect(),
            None => all,
        };
        if query.popular {
            sort_by_popularity(&mut tags);
        } else {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
        }
        tags.truncate(query.limit);

        Ok(TagListing {
            tags,
            statistics,
            filters: TagQuery {
                category: category.map(str::to_string),
                ..query.clone()
            },
        })
    }
}

fn overview(all: &[Tag]) -> TagStatistics {
    let categories: BTreeSet<&str> = all
        .iter()
        .map(|t| t.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    let mut top_tags = all.to_vec();
    top_tags.sort_by(|a, b| b.question_count.cmp(&a.question_count));
    top_tags.truncate(TOP_TAGS);

    TagStatistics {
        total_tags: all.len(),
        total_questions: all
            .iter()
            .fold(0i64, |sum, t| sum.saturating_add(t.question_count)),
        categories: categories.into_iter().map(str::to_string).collect(),
        top_tags,
    }
}
