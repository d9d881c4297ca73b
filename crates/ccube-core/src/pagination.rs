//! Offset/limit pagination.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Slice `items` to `[offset, offset + limit)` and describe the page.
#[must_use]
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> (Vec<T>, Pagination) {
    let total = items.len();
    let page = items.into_iter().skip(offset).take(limit).collect();
    let pagination = Pagination {
        total,
        limit,
        offset,
        has_more: offset.saturating_add(limit) < total,
    };
    (page, pagination)
}
