//! On-disk layout of the QA store.
//!
//! ```text
//! <root>/
//!   questions/index.json        ordered list of question ids
//!   questions/{id}.json
//!   answers/{question_id}/*.json
//!   answers/*comprehensive*.json
//!   votes/questions/{id}.json
//!   votes/answers/{id}.json
//!   tags/*.json
//! ```

use std::path::{Path, PathBuf};

use ccube_core::VoteTarget;

pub const QUESTIONS_DIR: &str = "questions";
pub const ANSWERS_DIR: &str = "answers";
pub const VOTES_DIR: &str = "votes";
pub const TAGS_DIR: &str = "tags";
pub const INDEX_FILE: &str = "index.json";

/// Marker substring identifying a precomputed answer bundle file.
pub const COMPREHENSIVE_MARKER: &str = "comprehensive";

/// Resolves store-relative paths from a root directory.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn questions_dir(&self) -> PathBuf {
        self.root.join(QUESTIONS_DIR)
    }

    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.questions_dir().join(INDEX_FILE)
    }

    #[must_use]
    pub fn question_path(&self, id: &str) -> PathBuf {
        self.questions_dir().join(format!("{id}.json"))
    }

    #[must_use]
    pub fn answers_dir(&self) -> PathBuf {
        self.root.join(ANSWERS_DIR)
    }

    #[must_use]
    pub fn question_answers_dir(&self, question_id: &str) -> PathBuf {
        self.answers_dir().join(question_id)
    }

    #[must_use]
    pub fn votes_dir(&self, target: VoteTarget) -> PathBuf {
        self.root.join(VOTES_DIR).join(target.dir_name())
    }

    #[must_use]
    pub fn votes_path(&self, target: VoteTarget, id: &str) -> PathBuf {
        self.votes_dir(target).join(format!("{id}.json"))
    }

    #[must_use]
    pub fn tags_dir(&self) -> PathBuf {
        self.root.join(TAGS_DIR)
    }
}

/// The fragment of a question id used to match comprehensive bundle file
/// names: its third `_`-delimited segment.
#[must_use]
pub fn bundle_fragment(question_id: &str) -> Option<&str> {
    question_id.split('_').nth(2).filter(|s| !s.is_empty())
}
