//! Transport-agnostic request router (spec.md §4.11): `route(method,
//! path, query, body) -> value | throws`. One `async fn` dispatched per
//! connection task — two concurrent clients never interleave within a
//! single connection, but different connections run concurrently
//! (spec.md §5).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use succ_core::errors::{SuccError, SuccResult};
use succ_core::memory::{MemoryId, MemoryType};
use succ_core::traits::{ChunkCorpus, MemoryStore};
use succ_memory::WriteRequest;
use succ_observability::health::{DaemonStatus, HealthResponse, HealthStatus, IndexStatus, MemoryStatus, StatusResponse};
use succ_retrieval::RetrieveOptions;

use crate::state::{run_consolidation_once, AppState};

pub async fn route(
    state: &Arc<AppState>,
    method: &str,
    path: &str,
    query: &HashMap<String, String>,
    body: &Value,
) -> SuccResult<Value> {
    state.touch_activity();

    match (method, path) {
        ("GET", "/health") => health(state),
        ("GET", "/api/status") => status(state),
        ("GET", "/api/services") => Ok(json!({ "services": state.services() })),

        ("POST", "/api/search") => search(state, ChunkCorpus::Document, body).await,
        ("POST", "/api/search-code") => search(state, ChunkCorpus::Code, body).await,
        ("POST", "/api/recall") => recall(state, body).await,
        ("POST", "/api/remember") => remember(state, body).await,

        ("POST", "/api/session/register") => session_register(state, body),
        ("POST", "/api/session/unregister") => session_unregister(state, body),
        ("POST", "/api/session/activity") => session_activity(state, body),

        ("GET", "/api/analyze/status") => Ok(json!({ "running": state.consolidation_guard.is_running() })),
        ("POST", "/api/analyze/trigger") => analyze_trigger(state).await,
        ("POST", "/api/analyze/start") => analyze_start(state).await,
        ("POST", "/api/analyze/stop") => analyze_stop(state).await,
        ("GET", "/api/analyze/index") => analyze_index(state, query),

        _ => Err(SuccError::NotFound(format!("no route for {method} {path}"))),
    }
}

fn health(state: &Arc<AppState>) -> SuccResult<Value> {
    let response = HealthResponse {
        status: HealthStatus::Ok,
        pid: state.pid,
        uptime_secs: state.uptime_secs(),
        active_sessions: state.sessions.len(),
    };
    Ok(serde_json::to_value(response).expect("HealthResponse is always serializable"))
}

fn status(state: &Arc<AppState>) -> SuccResult<Value> {
    let now = Utc::now();
    let memories = state.store.all_valid(now)?;
    let documents = state.store.all_chunks(ChunkCorpus::Document)?;
    let code_chunks = state.store.all_chunks(ChunkCorpus::Code)?;
    let stale = state.store.get_stale_files(ChunkCorpus::Document, &state.project_root)?;

    let total = memories.len();
    let pinned = memories.iter().filter(|m| m.is_pinned()).count();
    let average_quality = if total == 0 {
        0.0
    } else {
        memories.iter().map(|m| m.quality_score).sum::<f64>() / total as f64
    };

    let response = StatusResponse {
        daemon: DaemonStatus { pid: state.pid, uptime_secs: state.uptime_secs() },
        index: IndexStatus {
            document_count: documents.len(),
            code_chunk_count: code_chunks.len(),
            stale_files: stale.stale,
        },
        memories: MemoryStatus { total, pinned, average_quality },
        services: state.services(),
    };
    Ok(serde_json::to_value(response).expect("StatusResponse is always serializable"))
}

#[derive(Debug, Deserialize, Default)]
struct SearchRequest {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    threshold: Option<f64>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    since: Option<DateTime<Utc>>,
}

impl SearchRequest {
    fn into_options(self) -> RetrieveOptions {
        RetrieveOptions { limit: self.limit, threshold: self.threshold, tags: self.tags, since: self.since }
    }
}

async fn search(state: &Arc<AppState>, corpus: ChunkCorpus, body: &Value) -> SuccResult<Value> {
    let request: SearchRequest = serde_json::from_value(body.clone())
        .map_err(|e| SuccError::Validation(format!("invalid search request: {e}")))?;
    let opts = request.into_options();
    let query_text = opts_query(&opts, body)?;

    let mut retriever = state.retriever.lock().await;
    let results = retriever
        .retrieve_chunks(state.store.as_ref(), state.embedder.as_ref(), state.llm.as_deref(), corpus, &query_text, &opts)
        .await?;

    Ok(json!({
        "results": results.into_iter().map(|(chunk, score)| json!({ "chunk": chunk, "score": score })).collect::<Vec<_>>()
    }))
}

/// `RetrieveOptions` doesn't carry the query text itself; re-extract it
/// from the original body so `search`/`recall` share one struct.
fn opts_query(_opts: &RetrieveOptions, body: &Value) -> SuccResult<String> {
    body.get("query")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SuccError::Validation("missing \"query\" field".to_string()))
}

async fn recall(state: &Arc<AppState>, body: &Value) -> SuccResult<Value> {
    let request: SearchRequest = serde_json::from_value(body.clone())
        .map_err(|e| SuccError::Validation(format!("invalid recall request: {e}")))?;
    let opts = request.into_options();
    let query_text = opts_query(&opts, body)?;

    let stores: [&dyn MemoryStore; 1] = [state.store.as_ref()];
    let mut retriever = state.retriever.lock().await;
    let results = retriever
        .retrieve_memories(&stores, state.embedder.as_ref(), state.llm.as_deref(), None, &query_text, &opts)
        .await?;

    Ok(json!({
        "results": results.into_iter().map(|(memory, score)| json!({ "memory": memory, "score": score })).collect::<Vec<_>>()
    }))
}

#[derive(Debug, Deserialize)]
struct RememberRequest {
    content: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    source: String,
    #[serde(default)]
    memory_type: MemoryType,
    #[serde(default)]
    valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    supersedes: Option<MemoryId>,
}

async fn remember(state: &Arc<AppState>, body: &Value) -> SuccResult<Value> {
    let request: RememberRequest = serde_json::from_value(body.clone())
        .map_err(|e| SuccError::Validation(format!("invalid remember request: {e}")))?;

    let pipeline = state.write_pipeline();
    let outcome = pipeline.write(
        &request.content,
        WriteRequest {
            tags: request.tags,
            source: request.source,
            memory_type: request.memory_type,
            valid_from: request.valid_from,
            valid_until: request.valid_until,
        },
    )?;

    if !outcome.outcome.duplicate {
        succ_memory::apply_correction_if_requested(state.store.as_ref(), outcome.outcome.id, request.supersedes)?;
        let _ = succ_graph::auto_link(state.store.as_ref(), outcome.outcome.id, &outcome.embedding, 0.75, 5);
        let mut retriever = state.retriever.lock().await;
        retriever.index_memory(outcome.outcome.id, &request.content);
    }

    Ok(json!({ "id": outcome.outcome.id, "duplicate": outcome.outcome.duplicate }))
}

#[derive(Debug, Deserialize)]
struct SessionRegisterRequest {
    session_id: String,
    #[serde(default)]
    transcript_path: Option<String>,
}

fn session_register(state: &Arc<AppState>, body: &Value) -> SuccResult<Value> {
    let request: SessionRegisterRequest = serde_json::from_value(body.clone())
        .map_err(|e| SuccError::Validation(format!("invalid session register request: {e}")))?;
    state.sessions.register(&request.session_id, request.transcript_path);
    Ok(json!({ "registered": true }))
}

#[derive(Debug, Deserialize)]
struct SessionIdRequest {
    session_id: String,
}

fn session_unregister(state: &Arc<AppState>, body: &Value) -> SuccResult<Value> {
    let request: SessionIdRequest = serde_json::from_value(body.clone())
        .map_err(|e| SuccError::Validation(format!("invalid session unregister request: {e}")))?;
    let existed = state.sessions.unregister(&request.session_id).is_some();
    Ok(json!({ "unregistered": existed }))
}

#[derive(Debug, Deserialize)]
struct SessionActivityRequest {
    session_id: String,
    #[serde(default)]
    had_user_prompt: bool,
}

fn session_activity(state: &Arc<AppState>, body: &Value) -> SuccResult<Value> {
    let request: SessionActivityRequest = serde_json::from_value(body.clone())
        .map_err(|e| SuccError::Validation(format!("invalid session activity request: {e}")))?;
    state.sessions.record_activity(&request.session_id, request.had_user_prompt);
    Ok(json!({ "recorded": true }))
}

async fn analyze_trigger(state: &Arc<AppState>) -> SuccResult<Value> {
    let timeout_secs = state.config.idle_reflection.timeout_seconds;
    let state_clone = state.clone();
    let report = succ_idle::run_guarded(&state.consolidation_guard, "consolidation", timeout_secs, async move {
        run_consolidation_once(&state_clone).await
    })
    .await?;
    Ok(serde_json::to_value(ConsolidationReportDto::from(report)).expect("always serializable"))
}

#[derive(serde::Serialize)]
struct ConsolidationReportDto {
    pairs_considered: usize,
    deleted: usize,
    merged: usize,
    linked: usize,
}

impl From<succ_idle::ConsolidationReport> for ConsolidationReportDto {
    fn from(r: succ_idle::ConsolidationReport) -> Self {
        Self { pairs_considered: r.pairs_considered, deleted: r.deleted, merged: r.merged, linked: r.linked }
    }
}

/// Starts a background loop that runs consolidation once per idle
/// wall-clock slice (spec.md §5 "default 25 s synchronous slice") until
/// `analyze/stop` is called. A no-op if already running.
async fn analyze_start(state: &Arc<AppState>) -> SuccResult<Value> {
    let mut handle_slot = state.idle_loop_handle.lock().await;
    if handle_slot.is_some() {
        return Ok(json!({ "started": false, "reason": "already running" }));
    }
    let state_clone = state.clone();
    let slice_secs = succ_core::constants::IDLE_SYNC_SLICE_SECS;
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(slice_secs));
        loop {
            interval.tick().await;
            let timeout_secs = state_clone.config.idle_reflection.timeout_seconds;
            let inner_state = state_clone.clone();
            let result = succ_idle::run_guarded(&state_clone.consolidation_guard, "consolidation", timeout_secs, async move {
                run_consolidation_once(&inner_state).await
            })
            .await;
            if let Err(e) = result {
                tracing::warn!(error = %e, "idle consolidation slice failed");
            }
        }
    });
    *handle_slot = Some(handle);
    Ok(json!({ "started": true }))
}

async fn analyze_stop(state: &Arc<AppState>) -> SuccResult<Value> {
    let mut handle_slot = state.idle_loop_handle.lock().await;
    if let Some(handle) = handle_slot.take() {
        handle.abort();
        Ok(json!({ "stopped": true }))
    } else {
        Ok(json!({ "stopped": false, "reason": "not running" }))
    }
}

fn analyze_index(state: &Arc<AppState>, query: &HashMap<String, String>) -> SuccResult<Value> {
    let corpus = match query.get("corpus").map(String::as_str) {
        Some("code") => ChunkCorpus::Code,
        _ => ChunkCorpus::Document,
    };
    let report = state.store.get_stale_files(corpus, &state.project_root)?;
    Ok(json!({ "total": report.total, "stale": report.stale, "deleted": report.deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use succ_core::config::SuccConfig;
    use succ_embeddings::EmbeddingEngine;
    use succ_storage::StorageEngine;

    fn test_state() -> Arc<AppState> {
        let store = StorageEngine::open_in_memory().expect("in-memory store");
        let config = SuccConfig::default();
        // Local mode with no model on disk falls through to the hashing
        // fallback provider, never touching the network.
        let embedder = EmbeddingEngine::new(&config.embedding, Some("/nonexistent/model.onnx"), None)
            .expect("embedder falls back to hashing provider");
        Arc::new(AppState::new(PathBuf::from("."), config, store, embedder))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let state = test_state();
        let result = route(&state, "GET", "/health", &HashMap::new(), &Value::Null).await.unwrap();
        assert_eq!(result["status"], json!("ok"));
        assert_eq!(result["pid"], json!(state.pid));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let state = test_state();
        let err = route(&state, "GET", "/nope", &HashMap::new(), &Value::Null).await.unwrap_err();
        assert_eq!(err.kind(), "NotFound");
    }

    #[tokio::test]
    async fn remember_then_recall_round_trip() {
        let state = test_state();
        let body = json!({ "content": "prefer tabs over spaces in this repo", "memory_type": "decision" });
        let remember_result = route(&state, "POST", "/api/remember", &HashMap::new(), &body).await.unwrap();
        assert_eq!(remember_result["duplicate"], json!(false));

        let recall_body = json!({ "query": "tabs over spaces" });
        let recall_result = route(&state, "POST", "/api/recall", &HashMap::new(), &recall_body).await.unwrap();
        let results = recall_result["results"].as_array().expect("results array");
        assert!(!results.is_empty(), "expected the just-written memory to come back from recall");
    }

    #[tokio::test]
    async fn remember_twice_reports_duplicate() {
        let state = test_state();
        let body = json!({ "content": "the build script lives at scripts/build.sh" });
        route(&state, "POST", "/api/remember", &HashMap::new(), &body).await.unwrap();
        let second = route(&state, "POST", "/api/remember", &HashMap::new(), &body).await.unwrap();
        assert_eq!(second["duplicate"], json!(true));
    }

    #[tokio::test]
    async fn session_register_then_activity() {
        let state = test_state();
        let register = json!({ "session_id": "s1" });
        route(&state, "POST", "/api/session/register", &HashMap::new(), &register).await.unwrap();

        let activity = json!({ "session_id": "s1", "had_user_prompt": true });
        let result = route(&state, "POST", "/api/session/activity", &HashMap::new(), &activity).await.unwrap();
        assert_eq!(result["recorded"], json!(true));
    }

    #[tokio::test]
    async fn forget_rejects_pinned_memory() {
        let state = test_state();
        // Rule-language content ("must never") is auto-detected as an
        // invariant by the write pipeline, which pins it.
        let body = json!({ "content": "you must never commit the auth token to git" });
        let remember_result = route(&state, "POST", "/api/remember", &HashMap::new(), &body).await.unwrap();
        let id: succ_core::memory::MemoryId = serde_json::from_value(remember_result["id"].clone()).unwrap();

        let memory = state.store.get_by_id(id).unwrap().unwrap();
        assert!(memory.is_pinned(), "rule-language content should be auto-pinned");

        let err = succ_memory::forget(state.store.as_ref(), id).unwrap_err();
        assert_eq!(err.kind(), "PinnedMemory");
    }
}
