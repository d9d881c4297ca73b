//! Tag type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

/// A topic tag, persisted as `tags/{name}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Unique key; questions reference tags by this name.
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub question_count: i64,
    #[serde(default, deserialize_with = "lenient::score")]
    pub trending_score: f64,
    #[serde(default)]
    pub color: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tag {
    /// Create a tag with empty display metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            category: category.into(),
            question_count: 0,
            trending_score: 0.0,
            color: String::new(),
            extra: Map::new(),
        }
    }
}
