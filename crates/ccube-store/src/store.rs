//! Read and write access to the QA store's JSON files.
//!
//! Every call goes to disk. Nothing is cached and nothing is locked:
//! two concurrent writers of the same file race and the last write wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use ccube_core::error::validate_id;
use ccube_core::{
    Answer, ComprehensiveBundle, QaError, Question, Result, Tag, Vote, VoteTarget,
};

use crate::layout::{bundle_fragment, Layout, COMPREHENSIVE_MARKER, INDEX_FILE};

/// Handle on a QA store directory tree.
#[derive(Debug, Clone)]
pub struct QaStore {
    layout: Layout,
}

impl QaStore {
    /// Open a store rooted at `root`. The directory is not checked; a missing
    /// tree surfaces as `NotFound` from the first read that needs it.
    #[must_use]
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::new(root),
        }
    }

    /// Create the store directory layout with an empty question index.
    /// An existing index is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Io`] if a directory or the index cannot be created.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::open(root);
        let layout = &store.layout;
        for dir in [
            layout.questions_dir(),
            layout.answers_dir(),
            layout.votes_dir(VoteTarget::Question),
            layout.votes_dir(VoteTarget::Answer),
            layout.tags_dir(),
        ] {
            fs::create_dir_all(&dir)?;
        }
        if !layout.index_path().exists() {
            store.write_index(&[])?;
        }
        Ok(store)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    // === Questions ===

    /// Read the ordered question index.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::NotFound`] if the index file does not exist, or an
    /// internal error if it cannot be read or parsed.
    pub fn read_index(&self) -> Result<Vec<String>> {
        let path = self.layout.index_path();
        read_json(&path)?
            .ok_or_else(|| QaError::NotFound(format!("question index {}", path.display())))
    }

    /// Overwrite the question index.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the file cannot be written.
    pub fn write_index(&self, ids: &[String]) -> Result<()> {
        write_json(&self.layout.index_path(), ids)
    }

    /// Read one question, `None` if it has no file.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the file exists but cannot be read or parsed.
    pub fn read_question(&self, id: &str) -> Result<Option<Question>> {
        read_json(&self.layout.question_path(id))
    }

    /// Persist a question to `questions/{id}.json`. The file is keyed by
    /// `id`, not by the record's own `id` field.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::InvalidArgument`] for a path-like id, or an
    /// internal error if the file cannot be written.
    pub fn write_question(&self, id: &str, question: &Question) -> Result<()> {
        validate_id("question id", id)?;
        write_json(&self.layout.question_path(id), question)
    }

    /// Load every question named by the index, in index order. Ids without
    /// a backing file are skipped. Each record takes the id it is indexed
    /// under.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::NotFound`] if the index is absent, or an internal
    /// error if a present file cannot be read or parsed.
    pub fn load_questions(&self) -> Result<Vec<Question>> {
        let index = self.read_index()?;
        let mut questions = Vec::with_capacity(index.len());
        for id in &index {
            match self.read_question(id)? {
                Some(mut q) => {
                    if q.id != *id {
                        q.id.clone_from(id);
                    }
                    questions.push(q);
                }
                None => debug!(question_id = %id, "indexed question has no file, skipping"),
            }
        }
        Ok(questions)
    }

    // === Answers ===

    /// Find the comprehensive bundle for a question: a file directly under
    /// `answers/` whose name contains the question id's bundle fragment and
    /// the word `comprehensive`. When several match, the first by file name
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the directory or the matching file cannot
    /// be read, or the bundle cannot be parsed.
    pub fn find_comprehensive_bundle(
        &self,
        question_id: &str,
    ) -> Result<Option<ComprehensiveBundle>> {
        let Some(fragment) = bundle_fragment(question_id) else {
            return Ok(None);
        };
        let Some(files) = json_files(&self.layout.answers_dir())? else {
            return Ok(None);
        };
        let matched = files.into_iter().find(|path| {
            file_name(path).is_some_and(|name| {
                name.contains(fragment) && name.contains(COMPREHENSIVE_MARKER)
            })
        });
        match matched {
            Some(path) => {
                debug!(question_id, bundle = %path.display(), "using comprehensive bundle");
                read_json(&path)
            }
            None => Ok(None),
        }
    }

    /// Read every answer file in `answers/{question_id}/` except `index.json`,
    /// ordered by file name. `None` if the directory does not exist.
    ///
    /// # Errors
    ///
    /// Returns an internal error if any answer file cannot be read or parsed.
    pub fn read_answers(&self, question_id: &str) -> Result<Option<Vec<Answer>>> {
        let Some(files) = json_files(&self.layout.question_answers_dir(question_id))? else {
            return Ok(None);
        };
        let mut answers = Vec::with_capacity(files.len());
        for path in files {
            if file_name(&path) == Some(INDEX_FILE) {
                continue;
            }
            let answer: Answer = read_json(&path)?.ok_or_else(|| {
                QaError::Internal(format!("answer file vanished: {}", path.display()))
            })?;
            answers.push(answer);
        }
        Ok(Some(answers))
    }

    // === Votes ===

    /// Read the vote list for a question or answer, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the file exists but cannot be read or parsed.
    pub fn read_votes(&self, target: VoteTarget, id: &str) -> Result<Option<Vec<Vote>>> {
        read_json(&self.layout.votes_path(target, id))
    }

    // === Tags ===

    /// Whether the tags directory exists.
    #[must_use]
    pub fn has_tags(&self) -> bool {
        self.layout.tags_dir().is_dir()
    }

    /// Read every tag file, ordered by file name. Unreadable or malformed tag
    /// files are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::NotFound`] if the tags directory does not exist.
    pub fn read_tags(&self) -> Result<Vec<Tag>> {
        let dir = self.layout.tags_dir();
        let files = json_files(&dir)?
            .ok_or_else(|| QaError::NotFound(format!("tags directory {}", dir.display())))?;
        let mut tags = Vec::with_capacity(files.len());
        for path in files {
            match read_json::<Tag>(&path) {
                Ok(Some(tag)) => tags.push(tag),
                Ok(None) => {}
                Err(e) => warn!(file = %path.display(), error = %e, "skipping unreadable tag file"),
            }
        }
        Ok(tags)
    }
}

/// Read and parse a JSON file, mapping a missing file to `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value = serde_json::from_str(&raw)
        .map_err(|e| QaError::Serialization(format!("{}: {e}", path.display())))?;
    Ok(Some(value))
}

/// Write a value as 2-space indented JSON.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');
    fs::write(path, body)?;
    Ok(())
}

/// `*.json` regular files directly inside `dir`, sorted by name. `None` if
/// `dir` does not exist.
fn json_files(dir: &Path) -> Result<Option<Vec<PathBuf>>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(Some(files))
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
