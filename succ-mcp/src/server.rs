//! MCP server core: tool negotiation and dispatch. A thin adapter with
//! no state of its own beyond the shared engine (spec.md §4.12, §9
//! C12) — every tool either forwards to `succ_daemon::router::route`
//! or calls a single primitive directly.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use succ_core::memory::MemoryId;
use succ_core::models::{MemoryLink, RelationType};
use succ_core::traits::{MemoryStore, QualityScorer};
use succ_daemon::router::route;
use succ_daemon::state::AppState;

use crate::protocol::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_VERSION};
use crate::tools::{self, Profile};

pub struct McpServer {
    state: Arc<AppState>,
    initialized: bool,
    profile: Profile,
}

impl McpServer {
    pub fn new(state: Arc<AppState>, default_profile: Profile) -> Self {
        Self { state, initialized: false, profile: default_profile }
    }

    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<Result<JsonRpcResponse, JsonRpcError>> {
        let id = request.id.clone();

        if !self.initialized && request.method != "initialize" && request.method != "notifications/initialized" {
            return Some(Err(JsonRpcError::invalid_params("server not initialized")));
        }

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "notifications/initialized" => return None,
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params).await,
            "ping" => Ok(json!({})),
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(result.map(|value| JsonRpcResponse::success(id, value)))
    }

    fn handle_initialize(&mut self) -> Result<Value, JsonRpcError> {
        self.initialized = true;
        Ok(json!({
            "protocolVersion": MCP_VERSION,
            "serverInfo": { "name": "succ", "version": env!("CARGO_PKG_VERSION") },
            "capabilities": { "tools": { "listChanged": false } },
            "instructions": "succ is a local, per-project memory substrate. Use remember/recall/search \
                for durable context; forget/correct to fix mistakes; analyze_trigger to force \
                consolidation early.",
        }))
    }

    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        let list: Vec<Value> = tools::for_profile(self.profile)
            .into_iter()
            .map(|t| json!({ "name": t.name, "description": t.description, "inputSchema": (t.input_schema)() }))
            .collect();
        Ok(json!({ "tools": list }))
    }

    async fn handle_tools_call(&mut self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("missing params"))?;
        let name = params.get("name").and_then(Value::as_str).ok_or_else(|| JsonRpcError::invalid_params("missing tool name"))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let spec = tools::catalog().into_iter().find(|t| t.name == name).ok_or_else(|| JsonRpcError::method_not_found(name))?;
        if spec.profile > self.profile {
            if let Some(requested) = arguments.get("tool_profile").and_then(Value::as_str).and_then(Profile::parse) {
                if requested >= spec.profile {
                    self.profile = requested;
                }
            }
        }
        if spec.profile > self.profile {
            return Err(JsonRpcError::profile_upgrade_required(name, spec.profile.name()));
        }

        self.call_tool(name, &arguments).await.map_err(|e| JsonRpcError::from_succ_error(&e))
    }

    /// Dispatches by tool name. The spec.md §4.11 endpoint set is
    /// reused verbatim via `route`; tools with no daemon-route
    /// equivalent (graph editing, checkpoints, scoring) call the
    /// underlying primitive directly.
    async fn call_tool(&self, name: &str, args: &Value) -> succ_core::errors::SuccResult<Value> {
        use std::collections::HashMap;
        let empty_query = HashMap::new();

        match name {
            "remember" => route(&self.state, "POST", "/api/remember", &empty_query, args).await,
            "recall" => route(&self.state, "POST", "/api/recall", &empty_query, args).await,
            "search" => route(&self.state, "POST", "/api/search", &empty_query, args).await,
            "search_code" => route(&self.state, "POST", "/api/search-code", &empty_query, args).await,
            "health" => route(&self.state, "GET", "/health", &empty_query, &Value::Null).await,
            "status" => route(&self.state, "GET", "/api/status", &empty_query, &Value::Null).await,
            "services" => route(&self.state, "GET", "/api/services", &empty_query, &Value::Null).await,
            "session_register" => route(&self.state, "POST", "/api/session/register", &empty_query, args).await,
            "session_unregister" => route(&self.state, "POST", "/api/session/unregister", &empty_query, args).await,
            "session_activity" => route(&self.state, "POST", "/api/session/activity", &empty_query, args).await,
            "analyze_status" => route(&self.state, "GET", "/api/analyze/status", &empty_query, &Value::Null).await,
            "analyze_trigger" => route(&self.state, "POST", "/api/analyze/trigger", &empty_query, &Value::Null).await,
            "analyze_start" => route(&self.state, "POST", "/api/analyze/start", &empty_query, &Value::Null).await,
            "analyze_stop" => route(&self.state, "POST", "/api/analyze/stop", &empty_query, &Value::Null).await,
            "analyze_index" => {
                let mut query = HashMap::new();
                if let Some(corpus) = args.get("corpus").and_then(Value::as_str) {
                    query.insert("corpus".to_string(), corpus.to_string());
                }
                route(&self.state, "GET", "/api/analyze/index", &query, &Value::Null).await
            }

            "forget" => self.tool_forget(args),
            "correct" => self.tool_correct(args),
            "link" => self.tool_link(args),
            "neighbors" => self.tool_neighbors(args),
            "checkpoint_export" => self.tool_checkpoint_export(args),
            "checkpoint_import" => self.tool_checkpoint_import(args),
            "working_set" => self.tool_working_set(args),
            "quality_score" => self.tool_quality_score(args),
            "degradation_status" => self.tool_degradation_status().await,
            "invariant_check" => self.tool_invariant_check(args),
            "priority_score" => self.tool_priority_score(args),
            "reinforce" => self.tool_reinforce(args),
            "graph_centrality" => Ok(json!({ "boost_weight": self.state.config.graph_centrality.boost_weight, "enabled": self.state.config.graph_centrality.enabled })),
            "soul_read" => self.tool_soul_read(),
            "soul_write" => self.tool_soul_write(args),
            "retention_sweep" => self.tool_retention_sweep(),
            "config_get" => Ok(serde_json::to_value(&self.state.config).expect("SuccConfig is always serializable")),

            other => Err(succ_core::errors::SuccError::NotFound(format!("no tool named {other}"))),
        }
    }

    fn tool_forget(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let id = memory_id_arg(args)?;
        succ_memory::forget(self.state.store.as_ref(), id)?;
        Ok(json!({ "forgotten": true }))
    }

    fn tool_correct(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let superseded_id = args.get("superseded_id").and_then(Value::as_u64).ok_or_else(invalid("missing superseded_id"))?;
        let superseding_id = args.get("superseding_id").and_then(Value::as_u64).ok_or_else(invalid("missing superseding_id"))?;
        let link = succ_memory::correction::correct(self.state.store.as_ref(), superseding_id, superseded_id)?;
        Ok(serde_json::to_value(link).expect("MemoryLink is always serializable"))
    }

    fn tool_link(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let from_id = args.get("from_id").and_then(Value::as_u64).ok_or_else(invalid("missing from_id"))?;
        let to_id = args.get("to_id").and_then(Value::as_u64).ok_or_else(invalid("missing to_id"))?;
        let weight = args.get("weight").and_then(Value::as_f64).unwrap_or(1.0);
        let link = MemoryLink {
            id: 0,
            source_id: from_id,
            target_id: to_id,
            relation: RelationType::Related,
            weight,
            llm_enriched: false,
            created_at: Utc::now(),
        };
        let created = self.state.store.create_link(link)?;
        Ok(serde_json::to_value(created).expect("MemoryLink is always serializable"))
    }

    fn tool_neighbors(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let id = memory_id_arg(args)?;
        let (outgoing, incoming) = self.state.store.links_for(id)?;
        Ok(json!({ "outgoing": outgoing, "incoming": incoming }))
    }

    fn tool_checkpoint_export(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let path = args.get("path").and_then(Value::as_str).ok_or_else(invalid("missing path"))?;
        let project_name = self.state.project_root.file_name().and_then(|n| n.to_str()).unwrap_or("project");
        let checkpoint = succ_checkpoint::build_checkpoint(self.state.store.as_ref(), project_name, succ_checkpoint::ExportOptions::default())?;
        let gzip = path.ends_with(".gz");
        let bytes = succ_checkpoint::serialize(&checkpoint, gzip)?;
        std::fs::write(path, &bytes).map_err(|e| succ_core::errors::SuccError::from(succ_core::errors::StorageError::Sqlite { message: e.to_string() }))?;
        Ok(json!({ "path": path, "bytes_written": bytes.len() }))
    }

    fn tool_checkpoint_import(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let path = args.get("path").and_then(Value::as_str).ok_or_else(invalid("missing path"))?;
        let bytes = std::fs::read(path).map_err(|e| succ_core::errors::SuccError::from(succ_core::errors::StorageError::Sqlite { message: e.to_string() }))?;
        let checkpoint = succ_checkpoint::deserialize(&bytes)?;
        let report = succ_checkpoint::import_checkpoint(self.state.store.as_ref(), &checkpoint, succ_checkpoint::ImportOptions::default())?;
        Ok(serde_json::to_value(report).unwrap_or_else(|_| json!({})))
    }

    /// `build_working_set` ranks by priority within an item-count limit;
    /// here that limit is "all valid memories", and the token budget is
    /// applied afterward by greedily packing ranked memories until the
    /// counter reports the budget would be exceeded.
    fn tool_working_set(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let token_budget = args.get("token_budget").and_then(Value::as_u64).ok_or_else(invalid("missing token_budget"))? as usize;
        let now = Utc::now();
        let memories = self.state.store.all_valid(now)?;
        let ranked = succ_memory::build_working_set(&memories, memories.len(), now);

        let counter = succ_tokens::TokenCounter::new();
        let mut tokens_used = 0usize;
        let mut selected = Vec::new();
        for memory in ranked {
            let cost = counter.count(&memory.content);
            if tokens_used + cost > token_budget && !selected.is_empty() {
                break;
            }
            tokens_used += cost;
            selected.push(memory);
        }
        Ok(json!({ "memories": selected, "tokens_used": tokens_used }))
    }

    fn tool_quality_score(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let content = args.get("content").and_then(Value::as_str).ok_or_else(invalid("missing content"))?;
        let (score, factors) = self.state.quality_scorer.score(content, succ_core::memory::MemoryType::Observation);
        Ok(json!({ "score": score, "factors": factors }))
    }

    async fn tool_degradation_status(&self) -> succ_core::errors::SuccResult<Value> {
        let tracker = self.state.degradation.lock().await;
        Ok(json!({ "active": tracker.active_degradations().iter().map(|d| json!({ "component": d.event.component, "reason": d.event.failure, "fallback_used": d.event.fallback_used })).collect::<Vec<_>>() }))
    }

    fn tool_invariant_check(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let content = args.get("content").and_then(Value::as_str).ok_or_else(invalid("missing content"))?;
        Ok(json!({ "is_invariant": succ_memory::detect_invariant(content, None, &self.state.canonical_invariant_refs, 0.85) }))
    }

    fn tool_priority_score(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let id = memory_id_arg(args)?;
        let memory = self.state.store.get_by_id(id)?.ok_or_else(|| succ_core::errors::SuccError::NotFound(format!("memory {id}")))?;
        Ok(json!({ "priority_score": succ_memory::priority_score(&memory, Utc::now()) }))
    }

    fn tool_reinforce(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let id = memory_id_arg(args)?;
        self.state.store.reinforce(id)?;
        Ok(json!({ "reinforced": true }))
    }

    fn tool_soul_read(&self) -> succ_core::errors::SuccResult<Value> {
        let path = self.state.project_root.join(".succ").join("soul.md");
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        Ok(json!({ "content": content }))
    }

    fn tool_soul_write(&self, args: &Value) -> succ_core::errors::SuccResult<Value> {
        let content = args.get("content").and_then(Value::as_str).ok_or_else(invalid("missing content"))?;
        let dir = self.state.project_root.join(".succ");
        std::fs::create_dir_all(&dir).map_err(|e| succ_core::errors::SuccError::from(succ_core::errors::StorageError::Sqlite { message: e.to_string() }))?;
        std::fs::write(dir.join("soul.md"), content).map_err(|e| succ_core::errors::SuccError::from(succ_core::errors::StorageError::Sqlite { message: e.to_string() }))?;
        Ok(json!({ "written": true }))
    }

    /// Deletes non-pinned memories older than `retention.delete_threshold_days`
    /// (spec.md §6 `retention.{use_temporal_decay, keep_threshold, delete_threshold}`).
    fn tool_retention_sweep(&self) -> succ_core::errors::SuccResult<Value> {
        let retention = &self.state.config.retention;
        if !retention.use_temporal_decay {
            return Ok(json!({ "swept": 0, "reason": "temporal decay disabled" }));
        }
        let now = Utc::now();
        let memories = self.state.store.all_valid(now)?;
        let mut swept = 0usize;
        for memory in memories {
            if memory.is_pinned() {
                continue;
            }
            let age_days = (now - memory.created_at).num_days().max(0) as u64;
            if age_days >= retention.delete_threshold_days {
                self.state.store.delete(memory.id)?;
                swept += 1;
            }
        }
        Ok(json!({ "swept": swept }))
    }
}

fn memory_id_arg(args: &Value) -> succ_core::errors::SuccResult<MemoryId> {
    args.get("id").and_then(Value::as_u64).ok_or_else(|| succ_core::errors::SuccError::Validation("missing \"id\" field".to_string()))
}

fn invalid(message: &'static str) -> impl Fn() -> succ_core::errors::SuccError {
    move || succ_core::errors::SuccError::Validation(message.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;
    use succ_core::config::SuccConfig;
    use succ_embeddings::EmbeddingEngine;
    use succ_storage::StorageEngine;

    use super::*;
    use crate::protocol::types::JsonRpcRequest;

    fn test_server(profile: Profile) -> McpServer {
        let store = StorageEngine::open_in_memory().expect("in-memory store");
        let config = SuccConfig::default();
        let embedder = EmbeddingEngine::new(&config.embedding, Some("/nonexistent/model.onnx"), None)
            .expect("embedder falls back to hashing provider");
        let state = Arc::new(AppState::new(PathBuf::from("."), config, store, embedder));
        McpServer::new(state, profile)
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest { jsonrpc: "2.0".to_string(), id: Some(json!(1)), method: method.to_string(), params }
    }

    #[tokio::test]
    async fn requires_initialize_before_other_methods() {
        let mut server = test_server(Profile::Core);
        let err = server.handle_request(request("tools/list", None)).await.unwrap().unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn initialize_then_tools_list_matches_profile_size() {
        let mut server = test_server(Profile::Standard);
        server.handle_request(request("initialize", None)).await.unwrap().unwrap();

        let result = server.handle_request(request("tools/list", None)).await.unwrap().unwrap();
        let tools = result.result.unwrap();
        let tools = tools["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 20);
    }

    #[tokio::test]
    async fn remember_then_recall_round_trip_via_tools_call() {
        let mut server = test_server(Profile::Core);
        server.handle_request(request("initialize", None)).await.unwrap().unwrap();

        let remember_params = json!({
            "name": "remember",
            "arguments": { "content": "the release runbook lives in docs/runbook.md" },
        });
        let remember = server.handle_request(request("tools/call", Some(remember_params))).await.unwrap().unwrap();
        assert!(remember.result.is_some());

        let recall_params = json!({ "name": "recall", "arguments": { "query": "release runbook" } });
        let recall = server.handle_request(request("tools/call", Some(recall_params))).await.unwrap().unwrap();
        let results = recall.result.unwrap()["results"].as_array().cloned().unwrap_or_default();
        assert!(!results.is_empty(), "expected the just-written memory to come back from recall");
    }

    #[tokio::test]
    async fn out_of_profile_tool_rejected_then_succeeds_after_in_band_upgrade() {
        let mut server = test_server(Profile::Core);
        server.handle_request(request("initialize", None)).await.unwrap().unwrap();

        let memory_params = json!({
            "name": "remember",
            "arguments": { "content": "a memory that will be forgotten shortly" },
        });
        let remember = server.handle_request(request("tools/call", Some(memory_params))).await.unwrap().unwrap();
        let id = remember.result.unwrap()["id"].clone();

        let forget_params = json!({ "name": "forget", "arguments": { "id": id } });
        let rejected = server.handle_request(request("tools/call", Some(forget_params))).await.unwrap().unwrap_err();
        assert_eq!(rejected.code, -32602);

        let forget_with_upgrade = json!({ "name": "forget", "arguments": { "id": id, "tool_profile": "standard" } });
        let accepted = server.handle_request(request("tools/call", Some(forget_with_upgrade))).await.unwrap().unwrap();
        assert_eq!(accepted.result.unwrap()["forgotten"], json!(true));
    }
}
