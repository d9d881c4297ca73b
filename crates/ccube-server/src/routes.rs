//! HTTP routes: read-only JSON API over the QA store.
//!
//! Endpoints:
//!   GET /health                   → liveness check
//!   GET /questions                → filtered, sorted, paginated questions
//!   GET /questions/:id            → one question + related questions
//!   GET /questions/:id/answers    → ordered answers + statistics
//!   GET /votes?type=&id=          → votes on a question or answer + summary
//!   GET /tags                     → tags + overview statistics
//!   GET /stats                    → site statistics
//!
//! Any other method on these paths is a 405.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::Method;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, MethodRouter};
use axum::Router;
use serde::Deserialize;

use ccube_core::{Clock, QaError, Result};
use ccube_query::{
    parse_target, AnswerAggregator, AnswerListing, ListQuery, QuestionDetail, QuestionListing,
    QuestionRepository, QuestionSort, SiteStats, StatsAggregator, TagAggregator, TagListing,
    TagQuery, VoteAggregator, VoteListing,
};
use ccube_query::{questions::DEFAULT_LIST_LIMIT, tags::DEFAULT_TAG_LIMIT};
use ccube_store::QaStore;

use crate::error::ApiError;

// ── Shared state ──────────────────────────────────────────────────────────────

/// Per-process handles on the read components. Cloning is cheap; nothing
/// here caches store contents.
#[derive(Clone)]
pub struct AppState {
    questions: QuestionRepository,
    answers: AnswerAggregator,
    votes: VoteAggregator,
    tags: TagAggregator,
    stats: StatsAggregator,
    record_views: bool,
}

impl AppState {
    pub fn new(store: QaStore, clock: Arc<dyn Clock>, record_views: bool) -> Self {
        Self {
            questions: QuestionRepository::new(store.clone(), Arc::clone(&clock)),
            answers: AnswerAggregator::new(store.clone()),
            votes: VoteAggregator::new(store.clone()),
            tags: TagAggregator::new(store.clone()),
            stats: StatsAggregator::new(store, clock),
            record_views,
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", read_only(get(health)))
        .route("/questions", read_only(get(list_questions)))
        .route("/questions/:id", read_only(get(get_question)))
        .route("/questions/:id/answers", read_only(get(get_answers)))
        .route("/votes", read_only(get(get_votes)))
        .route("/tags", read_only(get(list_tags)))
        .route("/stats", read_only(get(site_stats)))
        .fallback(unknown_route)
        .with_state(state)
}

fn read_only(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(method_not_allowed)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Run store work on the blocking pool.
async fn blocking<T, F>(work: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| QaError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ApiError::from)
}

fn parse_count(name: &str, raw: Option<&str>, default: usize) -> Result<usize> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| {
            QaError::InvalidArgument(format!("{name} must be a non-negative integer, got '{s}'"))
        }),
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("true" | "1"))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError(QaError::MethodNotAllowed(format!(
        "{method} is not supported; this API is read-only"
    )))
}

async fn unknown_route() -> ApiError {
    ApiError(QaError::NotFound("no such endpoint".to_string()))
}

// GET /questions
#[derive(Debug, Deserialize)]
struct ListParams {
    category: Option<String>,
    sort: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
    search: Option<String>,
}

async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> std::result::Result<Json<QuestionListing>, ApiError> {
    let query = ListQuery {
        category: params.category,
        search: params.search,
        sort: params
            .sort
            .as_deref()
            .map(QuestionSort::from_param)
            .unwrap_or_default(),
        limit: parse_count("limit", params.limit.as_deref(), DEFAULT_LIST_LIMIT)?,
        offset: parse_count("offset", params.offset.as_deref(), 0)?,
    };
    let repo = state.questions;
    let listing = blocking(move || repo.list(&query)).await?;
    Ok(Json(listing))
}

// GET /questions/:id
async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<QuestionDetail>, ApiError> {
    let repo = state.questions;
    let record = state.record_views;
    let detail = blocking(move || {
        if record {
            repo.fetch(&id)
        } else {
            repo.peek(&id)
        }
    })
    .await?;
    Ok(Json(detail))
}

// GET /questions/:id/answers
async fn get_answers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<AnswerListing>, ApiError> {
    let answers = state.answers;
    let listing = blocking(move || answers.answers_for(&id)).await?;
    Ok(Json(listing))
}

// GET /votes
#[derive(Debug, Deserialize)]
struct VoteParams {
    #[serde(rename = "type")]
    target_type: Option<String>,
    id: Option<String>,
}

async fn get_votes(
    State(state): State<AppState>,
    Query(params): Query<VoteParams>,
) -> std::result::Result<Json<VoteListing>, ApiError> {
    let (target, id) = parse_target(params.target_type.as_deref(), params.id.as_deref())?;
    let votes = state.votes;
    let listing = blocking(move || votes.votes_for(target, &id)).await?;
    Ok(Json(listing))
}

// GET /tags
#[derive(Debug, Deserialize)]
struct TagParams {
    popular: Option<String>,
    limit: Option<String>,
    category: Option<String>,
}

async fn list_tags(
    State(state): State<AppState>,
    Query(params): Query<TagParams>,
) -> std::result::Result<Json<TagListing>, ApiError> {
    let query = TagQuery {
        category: params.category,
        popular: parse_flag(params.popular.as_deref()),
        limit: parse_count("limit", params.limit.as_deref(), DEFAULT_TAG_LIMIT)?,
    };
    let tags = state.tags;
    let listing = blocking(move || tags.list(&query)).await?;
    Ok(Json(listing))
}

// GET /stats
async fn site_stats(
    State(state): State<AppState>,
) -> std::result::Result<Json<SiteStats>, ApiError> {
    let stats = state.stats;
    let overview = blocking(move || stats.site_stats()).await?;
    Ok(Json(overview))
}
