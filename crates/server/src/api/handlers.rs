//! HTTP request handlers and shared application state.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use futures::StreamExt;

use askstack_core::config::AppConfig;
use askstack_llm::{LlmClient, LlmRequest};
use askstack_prompt::{build_ask_prompt, PromptSource};
use askstack_retrieval::{
    CachedSearch, JsonFileSource, MatchResult, Query, RankingPolicy, RecordSource, ScanControl,
    SearchError, SearchOutcome, StreamingMatcher,
};

use crate::api::errors::ApiError;
use crate::api::models::*;

/// Shared application state, cloned into every handler via Axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Memoized search over the streamed dataset
    pub search: Arc<CachedSearch>,
    /// The streamed dataset itself, probed by the health endpoint
    pub dataset: Arc<dyn RecordSource>,
    /// Search over the local JSON corpus, when one was loaded at startup
    pub local: Option<Arc<LocalSearch>>,
    pub llm: Arc<dyn LlmClient>,
}

/// Score-ranked search over a file-backed corpus.
///
/// Keeps a handle on the underlying source so that a completed search with
/// no matches can fall back to the head of the file.
pub struct LocalSearch {
    source: Arc<JsonFileSource>,
    matcher: StreamingMatcher,
}

impl LocalSearch {
    pub fn new(source: JsonFileSource) -> Self {
        let source = Arc::new(source);
        let matcher = StreamingMatcher::new(source.clone()).with_policy(RankingPolicy::ScoreOnly);
        Self { source, matcher }
    }

    pub async fn search(
        &self,
        query: &Query,
        control: &ScanControl,
    ) -> Result<SearchOutcome, SearchError> {
        self.matcher.search(query, control).await
    }

    /// The first records of the file, for completed searches that matched nothing.
    pub fn fallback(&self, limit: usize) -> Vec<MatchResult> {
        self.source
            .records()
            .iter()
            .take(limit)
            .map(MatchResult::from_record)
            .collect()
    }
}

/// `GET /` - liveness message.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "askstack Q&A backend is running.".to_string(),
    })
}

/// `POST /ask` - answer a question, grounded on the requested corpus.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(ApiError::BadRequest("Missing question".to_string()));
    }

    let query = build_query(&state.config, &question, &request);
    let control = scan_control(&state.config);
    let source = request.source.as_deref().unwrap_or("stream");

    let (sources, status) = match source {
        "stream" | "hf" => {
            let outcome = state.search.search(&query, &control).await?;
            (outcome.results, outcome.status.to_string())
        }
        "local" => {
            let local = state.local.as_ref().ok_or_else(|| {
                ApiError::Internal("Local data file not found. Generate it first.".to_string())
            })?;
            let outcome = local.search(&query, &control).await?;
            let status = outcome.status.to_string();
            let results = if outcome.is_done() && outcome.results.is_empty() {
                local.fallback(query.max_results)
            } else {
                outcome.results
            };
            (results, status)
        }
        "llm" => (Vec::new(), "done".to_string()),
        _ => return Err(ApiError::BadRequest("Invalid source option".to_string())),
    };

    let answer = generate_answer(&state, &question, &sources).await;
    let tokens = answer.split_whitespace().count();

    Ok(Json(AskResponse {
        answer,
        sources,
        tokens,
        status,
    }))
}

/// `GET /health/dataset` - probe the streamed dataset for a first record.
pub async fn dataset_health(
    State(state): State<AppState>,
) -> Result<Json<DatasetHealthResponse>, ApiError> {
    let mut records = state.dataset.produce();
    match records.next().await {
        Some(Ok(record)) => Ok(Json(DatasetHealthResponse {
            status: "ok".to_string(),
            sample_question: record.question_text,
            sample_answer: record.answer_text,
        })),
        Some(Err(e)) => Err(ApiError::ServiceUnavailable(format!(
            "Dataset stream failed: {}",
            e
        ))),
        None => Err(ApiError::ServiceUnavailable(
            "Dataset stream returned no records".to_string(),
        )),
    }
}

/// `GET /stats` - search cache counters.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.search.stats();
    Json(StatsResponse {
        cache: CacheStatsBody {
            hits: cache.hits,
            misses: cache.misses,
            hit_rate: cache.hit_rate(),
            entries: state.search.len(),
        },
    })
}

fn build_query(config: &AppConfig, question: &str, request: &AskRequest) -> Query {
    let mut query = Query::new(question)
        .with_tags_filter(request.tags.clone())
        .with_max_results(request.max_results.unwrap_or(config.scan.max_results))
        .with_max_items_scanned(config.scan.max_items_scanned);
    if let Some(min_score) = request.min_score {
        query = query.with_min_score(min_score);
    }
    query
}

fn scan_control(config: &AppConfig) -> ScanControl {
    match config.scan.timeout_secs {
        Some(secs) => ScanControl::new().with_timeout(Duration::from_secs(secs)),
        None => ScanControl::new(),
    }
}

/// Render the prompt and call the LLM, degrading to the top source's answer
/// (or a fixed apology) when the completion fails.
async fn generate_answer(state: &AppState, question: &str, sources: &[MatchResult]) -> String {
    let prompt_sources: Vec<PromptSource> = sources.iter().map(to_prompt_source).collect();

    let built = match build_ask_prompt(question, &prompt_sources) {
        Ok(built) => built,
        Err(e) => {
            tracing::error!(error = %e, "Prompt rendering failed");
            return degraded_answer(sources);
        }
    };

    let mut llm_request = LlmRequest::new(built.user, state.config.model.clone());
    if let Some(system) = built.system {
        llm_request = llm_request.with_system(system);
    }

    match state.llm.complete(&llm_request).await {
        Ok(response) => response.content,
        Err(e) => {
            tracing::warn!(error = %e, "LLM completion failed, serving degraded answer");
            degraded_answer(sources)
        }
    }
}

fn degraded_answer(sources: &[MatchResult]) -> String {
    match sources.first() {
        Some(first) => first.answer.clone(),
        None => "Sorry, I couldn't find an answer.".to_string(),
    }
}

fn to_prompt_source(result: &MatchResult) -> PromptSource {
    PromptSource::new(result.question.clone(), result.answer.clone())
        .with_tags(result.tags.clone())
        .with_score(result.score)
}
