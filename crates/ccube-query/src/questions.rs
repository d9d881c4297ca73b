//! Question repository: single-question reads, view recording, listing,
//! and related-question ranking.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ccube_core::error::validate_id;
use ccube_core::scoring::{common_tags, listing_trending_score, related_rank, tag_similarity};
use ccube_core::{
    paginate, Clock, Pagination, QaError, Question, RelatedQuestion, Result,
};
use ccube_store::QaStore;

/// Maximum number of related questions returned with a question.
pub const RELATED_LIMIT: usize = 5;

/// Default page size for question listings.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Sort order for question listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSort {
    /// Descending creation time.
    #[default]
    Newest,
    /// Descending last activity.
    Active,
    Votes,
    Views,
    /// Descending weighted score of votes, views, and answers.
    Trending,
}

impl QuestionSort {
    /// Parse a sort key; anything unrecognized means `newest`.
    #[must_use]
    pub fn from_param(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "votes" => Self::Votes,
            "views" => Self::Views,
            "trending" => Self::Trending,
            _ => Self::Newest,
        }
    }

    fn compare(self, a: &Question, b: &Question) -> Ordering {
        match self {
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::Active => b.last_activity.cmp(&a.last_activity),
            Self::Votes => b.votes.cmp(&a.votes),
            Self::Views => b.views.cmp(&a.views),
            Self::Trending => listing_trending_score(b)
                .partial_cmp(&listing_trending_score(a))
                .unwrap_or(Ordering::Equal),
        }
    }
}

/// Filters, order, and page for a question listing.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: QuestionSort,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            sort: QuestionSort::Newest,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

/// Echo of the filters applied to a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilters {
    pub category: Option<String>,
    pub sort: QuestionSort,
    pub search: Option<String>,
}

/// One page of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionListing {
    pub questions: Vec<Question>,
    pub pagination: Pagination,
    pub filters: ListFilters,
}

/// A question together with its related questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question: Question,
    pub related_questions: Vec<RelatedQuestion>,
}

/// Reads and updates question records.
#[derive(Clone)]
pub struct QuestionRepository {
    store: QaStore,
    clock: Arc<dyn Clock>,
}

impl QuestionRepository {
    pub fn new(store: QaStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Load a question without side effects. The returned record carries
    /// the id it was stored under, whatever its file says.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::InvalidArgument`] for an empty or path-like id,
    /// [`QaError::NotFound`] if the question has no file.
    pub fn get(&self, id: &str) -> Result<Question> {
        validate_id("question id", id)?;
        let mut question = self
            .store
            .read_question(id)?
            .ok_or_else(|| QaError::NotFound(format!("question {id}")))?;
        if question.id != id {
            debug!(
                question_id = %id,
                stored_id = %question.id,
                "question file id differs from its name"
            );
            question.id = id.to_string();
        }
        Ok(question)
    }

    /// Count one view: increment `views`, set `last_activity` to now, and
    /// persist. Concurrent calls for the same id may lose increments.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), plus an internal error if the write fails.
    pub fn record_view(&self, id: &str) -> Result<Question> {
        let question = self.get(id)?;
        self.persist_view(id, question)
    }

    fn persist_view(&self, id: &str, mut question: Question) -> Result<Question> {
        question.views = question.views.saturating_add(1);
        question.last_activity = Some(self.clock.now());
        self.store.write_question(id, &question)?;
        info!(question_id = %id, views = question.views, "recorded question view");
        Ok(question)
    }

    /// Record a view and return the updated question with its related
    /// questions. Related questions are resolved before the view is written,
    /// so a failed fetch leaves the stored counter untouched.
    ///
    /// # Errors
    ///
    /// Same as [`record_view`](Self::record_view), plus the errors of
    /// [`related`](Self::related).
    pub fn fetch(&self, id: &str) -> Result<QuestionDetail> {
        let question = self.get(id)?;
        let related_questions = self.related(&question)?;
        let question = self.persist_view(id, question)?;
        Ok(QuestionDetail {
            question,
            related_questions,
        })
    }

    /// Like [`fetch`](Self::fetch) but without recording a view.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn peek(&self, id: &str) -> Result<QuestionDetail> {
        let question = self.get(id)?;
        self.with_related(question)
    }

    fn with_related(&self, question: Question) -> Result<QuestionDetail> {
        let related_questions = self.related(&question)?;
        Ok(QuestionDetail {
            question,
            related_questions,
        })
    }

    /// Rank other indexed questions by shared tags.
    ///
    /// Candidates must share at least one tag. Candidates whose file is
    /// missing or unreadable are skipped. Similarity is
    /// `|common| / max(|target tags|, |candidate tags|)`; rank is
    /// `similarity * 0.7 + votes * 0.3`. At most [`RELATED_LIMIT`] results.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the question index cannot be read or
    /// parsed.
    pub fn related(&self, question: &Question) -> Result<Vec<RelatedQuestion>> {
        if question.tags.is_empty() {
            return Ok(Vec::new());
        }
        let index = match self.store.read_index() {
            Ok(index) => index,
            Err(QaError::NotFound(_)) => {
                debug!(question_id = %question.id, "no question index, no related questions");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut ranked: Vec<(f64, RelatedQuestion)> = Vec::new();
        for id in index.iter().filter(|id| **id != question.id) {
            let candidate = match self.store.read_question(id) {
                Ok(Some(candidate)) => candidate,
                Ok(None) => continue,
                Err(e) => {
                    warn!(question_id = %id, error = %e, "skipping unreadable related candidate");
                    continue;
                }
            };
            let common = common_tags(&question.tags, &candidate.tags);
            if common.is_empty() {
                continue;
            }
            let similarity_score =
                tag_similarity(common.len(), question.tags.len(), candidate.tags.len());
            let rank = related_rank(similarity_score, candidate.votes);
            ranked.push((
                rank,
                RelatedQuestion {
                    id: id.clone(),
                    title: candidate.title,
                    tags: candidate.tags,
                    votes: candidate.votes,
                    views: candidate.views,
                    answer_count: candidate.answer_count,
                    common_tags: common,
                    similarity_score,
                },
            ));
        }

        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        Ok(ranked
            .into_iter()
            .take(RELATED_LIMIT)
            .map(|(_, related)| related)
            .collect())
    }

    /// Filter, sort, and paginate all indexed questions.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::NotFound`] if the question index is absent.
    pub fn list(&self, query: &ListQuery) -> Result<QuestionListing> {
        let category = non_empty(query.category.as_deref());
        let search = non_empty(query.search.as_deref());

        let mut questions = self.store.load_questions()?;
        if let Some(category) = category {
            questions.retain(|q| q.matches_category(category));
        }
        if let Some(search) = search {
            questions.retain(|q| q.matches_search(search));
        }
        questions.sort_by(|a, b| query.sort.compare(a, b));

        let (questions, pagination) = paginate(questions, query.offset, query.limit);
        Ok(QuestionListing {
            questions,
            pagination,
            filters: ListFilters {
                category: category.map(str::to_string),
                sort: query.sort,
                search: search.map(str::to_string),
            },
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, write, StoreFixture};
    use ccube_core::FixedClock;
    use serde_json::json;

    fn repo(fx: &StoreFixture) -> QuestionRepository {
        QuestionRepository::new(fx.store(), Arc::new(FixedClock(at(2025, 3, 1))))
    }

    #[test]
    fn get_missing_question_is_not_found() {
        let fx = StoreFixture::new();
        fx.index(&["q1"]);
        assert!(matches!(repo(&fx).get("q1"), Err(QaError::NotFound(_))));
    }

    #[test]
    fn get_rejects_empty_id() {
        let fx = StoreFixture::new();
        assert!(matches!(
            repo(&fx).get(""),
            Err(QaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn get_has_no_side_effects() {
        let fx = StoreFixture::new();
        fx.index(&["q1"]);
        fx.question(json!({"id": "q1", "views": 3}));

        let repo = repo(&fx);
        repo.get("q1").unwrap();
        repo.peek("q1").unwrap();
        assert_eq!(repo.get("q1").unwrap().views, 3);
    }

    #[test]
    fn fetching_twice_adds_two_views_and_touches_activity() {
        let fx = StoreFixture::new();
        fx.index(&["q1"]);
        fx.question(json!({"id": "q1", "title": "Deploy", "views": 10}));

        let repo = repo(&fx);
        repo.fetch("q1").unwrap();
        let detail = repo.fetch("q1").unwrap();

        assert_eq!(detail.question.views, 12);
        assert_eq!(detail.question.last_activity, Some(at(2025, 3, 1)));
        assert_eq!(repo.get("q1").unwrap().views, 12);
    }

    #[test]
    fn view_recording_preserves_unknown_fields() {
        let fx = StoreFixture::new();
        fx.index(&["q1"]);
        fx.question(json!({"id": "q1", "author": {"name": "sam"}}));

        repo(&fx).record_view("q1").unwrap();
        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(fx.path().join("questions/q1.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["author"]["name"], "sam");
        assert_eq!(raw["views"], 1);
    }

    #[test]
    fn views_are_recorded_under_the_requested_id() {
        let fx = StoreFixture::new();
        fx.index(&["q1"]);
        write(fx.path(), "questions/q1.json", r#"{"id":"other","views":3}"#);

        let repo = repo(&fx);
        let detail = repo.fetch("q1").unwrap();
        assert_eq!(detail.question.id, "q1");
        repo.fetch("q1").unwrap();

        assert_eq!(repo.get("q1").unwrap().views, 5);
        assert!(!fx.path().join("questions/other.json").exists());
    }

    #[test]
    fn path_like_id_inside_file_stays_in_place() {
        let fx = StoreFixture::new();
        fx.index(&["q1"]);
        write(fx.path(), "questions/q1.json", r#"{"id":"../x","views":0}"#);

        repo(&fx).record_view("q1").unwrap();
        assert!(!fx.path().join("x.json").exists());
        assert_eq!(repo(&fx).get("q1").unwrap().views, 1);
    }

    #[test]
    fn file_without_id_takes_the_requested_one() {
        let fx = StoreFixture::new();
        fx.index(&["q1"]);
        write(fx.path(), "questions/q1.json", r#"{"title":"No id"}"#);

        let question = repo(&fx).record_view("q1").unwrap();
        assert_eq!(question.id, "q1");
        assert_eq!(question.views, 1);
    }

    #[test]
    fn view_count_saturates() {
        let fx = StoreFixture::new();
        fx.index(&["q1"]);
        fx.question(json!({"id": "q1", "views": i64::MAX}));

        let question = repo(&fx).record_view("q1").unwrap();
        assert_eq!(question.views, i64::MAX);
    }

    #[test]
    fn corrupt_related_candidate_is_skipped() {
        let fx = StoreFixture::new();
        fx.index(&["q1", "q2", "q3"]);
        fx.question(json!({"id": "q1", "tags": ["bsc"]}));
        write(fx.path(), "questions/q2.json", "{broken");
        fx.question(json!({"id": "q3", "tags": ["bsc"]}));

        let detail = repo(&fx).fetch("q1").unwrap();
        assert_eq!(detail.question.views, 1);
        let ids: Vec<&str> = detail.related_questions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["q3"]);
    }

    #[test]
    fn failed_fetch_leaves_views_unchanged() {
        let fx = StoreFixture::new();
        write(fx.path(), "questions/index.json", "[broken");
        fx.question(json!({"id": "q1", "tags": ["bsc"], "views": 4}));

        let repo = repo(&fx);
        let err = repo.fetch("q1").unwrap_err();
        assert!(matches!(err, QaError::Serialization(_)), "{err:?}");
        assert_eq!(repo.get("q1").unwrap().views, 4);
    }

    #[test]
    fn related_scores_shared_tags() {
        let fx = StoreFixture::new();
        fx.index(&["q1", "q2"]);
        fx.question(json!({"id": "q1", "tags": ["bsc", "token"]}));
        fx.question(json!({"id": "q2", "tags": ["bsc", "defi"]}));

        let detail = repo(&fx).fetch("q1").unwrap();
        assert_eq!(detail.related_questions.len(), 1);
        let related = &detail.related_questions[0];
        assert_eq!(related.id, "q2");
        assert_eq!(related.common_tags, vec!["bsc"]);
        assert!((related.similarity_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn related_excludes_self_unrelated_and_caps_at_five() {
        let fx = StoreFixture::new();
        let mut ids = vec!["q0".to_string()];
        fx.question(json!({"id": "q0", "tags": ["rust"]}));
        for i in 1..=7 {
            let id = format!("q{i}");
            fx.question(json!({"id": id, "tags": ["rust"], "votes": i}));
            ids.push(id);
        }
        fx.question(json!({"id": "other", "tags": ["go"]}));
        ids.push("other".to_string());
        ids.push("missing".to_string());
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        fx.index(&refs);

        let related = repo(&fx).peek("q0").unwrap().related_questions;
        assert_eq!(related.len(), RELATED_LIMIT);
        assert!(related.iter().all(|r| r.id != "q0" && r.id != "other"));
        assert!(related.iter().all(|r| !r.common_tags.is_empty()));
        // equal similarity, so votes decide
        assert_eq!(related[0].id, "q7");
        assert_eq!(related[4].id, "q3");
    }

    #[test]
    fn related_without_index_is_empty() {
        let fx = StoreFixture::new();
        fx.question(json!({"id": "q1", "tags": ["bsc"]}));
        let detail = repo(&fx).peek("q1").unwrap();
        assert!(detail.related_questions.is_empty());
    }

    fn listing_fixture() -> StoreFixture {
        let fx = StoreFixture::new();
        fx.index(&["a", "b", "c", "ghost"]);
        fx.question(json!({
            "id": "a", "title": "Token deploy", "tags": ["bsc", "token"],
            "votes": 1, "views": 100, "answer_count": 0,
            "created_at": "2025-01-01T00:00:00Z", "last_activity": "2025-02-20T00:00:00Z"
        }));
        fx.question(json!({
            "id": "b", "title": "Lending pools", "content": "How do BSC pools work?",
            "tags": ["defi-lending"], "votes": 9, "views": 5, "answer_count": 4,
            "created_at": "2025-01-03T00:00:00Z", "last_activity": "2025-01-04T00:00:00Z"
        }));
        fx.question(json!({
            "id": "c", "title": "Wallet sync", "tags": ["wallet"],
            "votes": 4, "views": 20, "answer_count": 1,
            "created_at": "2025-01-02T00:00:00Z"
        }));
        fx
    }

    fn ids(listing: &QuestionListing) -> Vec<&str> {
        listing.questions.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn list_tolerates_null_and_float_counters() {
        let fx = StoreFixture::new();
        fx.index(&["q1", "q2"]);
        write(fx.path(), "questions/q1.json", r#"{"id":"q1","votes":null,"views":2.0}"#);
        fx.question(json!({"id": "q2", "views": 1}));

        let listing = repo(&fx)
            .list(&ListQuery {
                sort: QuestionSort::Views,
                ..ListQuery::default()
            })
            .unwrap();
        assert_eq!(ids(&listing), ["q1", "q2"]);
        assert_eq!(listing.questions[0].votes, 0);
        assert_eq!(listing.questions[0].views, 2);
    }

    #[test]
    fn list_sorts_by_each_key() {
        let fx = listing_fixture();
        let repo = repo(&fx);
        let list = |sort| {
            repo.list(&ListQuery {
                sort,
                ..ListQuery::default()
            })
            .unwrap()
        };

        assert_eq!(ids(&list(QuestionSort::Newest)), vec!["b", "c", "a"]);
        assert_eq!(ids(&list(QuestionSort::Active)), vec!["a", "b", "c"]);
        assert_eq!(ids(&list(QuestionSort::Votes)), vec!["b", "c", "a"]);
        assert_eq!(ids(&list(QuestionSort::Views)), vec!["a", "c", "b"]);
        // a: 0.5+30+0 = 30.5, b: 4.5+1.5+0.8 = 6.8, c: 2+6+0.2 = 8.2
        assert_eq!(ids(&list(QuestionSort::Trending)), vec!["a", "c", "b"]);
    }

    #[test]
    fn list_filters_by_category_and_search() {
        let fx = listing_fixture();
        let repo = repo(&fx);

        let by_category = repo
            .list(&ListQuery {
                category: Some("defi".to_string()),
                ..ListQuery::default()
            })
            .unwrap();
        assert_eq!(ids(&by_category), vec!["b"]);

        let by_search = repo
            .list(&ListQuery {
                search: Some("bsc".to_string()),
                ..ListQuery::default()
            })
            .unwrap();
        assert_eq!(ids(&by_search), vec!["b", "a"]);
        assert_eq!(by_search.filters.search.as_deref(), Some("bsc"));
    }

    #[test]
    fn list_paginates_after_filtering() {
        let fx = listing_fixture();
        let listing = repo(&fx)
            .list(&ListQuery {
                limit: 2,
                offset: 1,
                ..ListQuery::default()
            })
            .unwrap();
        assert_eq!(ids(&listing), vec!["c", "a"]);
        assert_eq!(listing.pagination.total, 3);
        assert!(!listing.pagination.has_more);
    }

    #[test]
    fn list_without_index_is_not_found() {
        let fx = StoreFixture::new();
        write(fx.path(), "questions/q1.json", r#"{"id":"q1"}"#);
        assert!(matches!(
            repo(&fx).list(&ListQuery::default()),
            Err(QaError::NotFound(_))
        ));
    }

    #[test]
    fn unknown_sort_falls_back_to_newest() {
        assert_eq!(QuestionSort::from_param("hot"), QuestionSort::Newest);
        assert_eq!(QuestionSort::from_param("views"), QuestionSort::Views);
    }
}
