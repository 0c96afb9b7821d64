//! Shared engine handle (spec.md §9 "dependency-injected handles"): one
//! `AppState` owns the dispatcher, embedder, BM25 indexes and graph;
//! the router takes it by reference per connection task.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Mutex;

use succ_core::config::SuccConfig;
use succ_core::constants::{DEFAULT_DEDUP_THRESHOLD, DEFAULT_INVARIANT_SIMILARITY_THRESHOLD};
use succ_core::errors::SuccResult;
use succ_core::traits::Llm;
use succ_embeddings::EmbeddingEngine;
use succ_idle::JobGuard;
use succ_observability::DegradationTracker;
use succ_privacy::PrivacyEngine;
use succ_quality::HeuristicQualityScorer;
use succ_retrieval::HybridRetriever;
use succ_session::SessionRegistry;
use succ_storage::StorageEngine;

pub struct AppState {
    pub project_root: PathBuf,
    pub config: SuccConfig,
    pub store: Arc<StorageEngine>,
    pub embedder: Arc<EmbeddingEngine>,
    pub sanitizer: PrivacyEngine,
    pub quality_scorer: HeuristicQualityScorer,
    pub retriever: Mutex<HybridRetriever>,
    pub sessions: SessionRegistry,
    pub degradation: Mutex<DegradationTracker>,
    /// Injected chat-completion capability. No concrete provider ships
    /// in this workspace (spec.md §1: cloud LLM callers are injected,
    /// not part of the core); idle jobs that need one degrade to their
    /// no-LLM behavior when this is `None`.
    pub llm: Option<Arc<dyn Llm>>,
    /// Reference phrases for invariant embedding-similarity matching
    /// (spec.md §4.6). Empty by default: no canonical set ships with
    /// the engine, so invariant detection falls back to rule-language
    /// regex matching alone until an operator seeds one.
    pub canonical_invariant_refs: Vec<Vec<f32>>,
    pub started_at: Instant,
    pub pid: u32,
    last_activity_unix: AtomicI64,
    pub consolidation_guard: JobGuard,
    pub idle_loop_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl AppState {
    pub fn new(
        project_root: PathBuf,
        config: SuccConfig,
        store: StorageEngine,
        embedder: EmbeddingEngine,
    ) -> Self {
        let retriever = HybridRetriever::new(config.retrieval.clone(), config.graph_centrality.clone());
        Self {
            project_root,
            config,
            store: Arc::new(store),
            embedder: Arc::new(embedder),
            sanitizer: PrivacyEngine::new(),
            quality_scorer: HeuristicQualityScorer::new(),
            retriever: Mutex::new(retriever),
            sessions: SessionRegistry::new(),
            degradation: Mutex::new(DegradationTracker::new()),
            llm: None,
            canonical_invariant_refs: Vec::new(),
            started_at: Instant::now(),
            pid: std::process::id(),
            last_activity_unix: AtomicI64::new(Utc::now().timestamp()),
            consolidation_guard: JobGuard::new(),
            idle_loop_handle: Mutex::new(None),
        }
    }

    pub fn touch_activity(&self) {
        self.last_activity_unix.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    pub fn seconds_since_activity(&self) -> i64 {
        Utc::now().timestamp() - self.last_activity_unix.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn write_pipeline(&self) -> succ_memory::WritePipeline<'_> {
        succ_memory::WritePipeline {
            store: self.store.as_ref(),
            embedder: self.embedder.as_ref(),
            sanitizer: &self.sanitizer,
            quality_scorer: &self.quality_scorer,
            quality_threshold: self.config.quality_threshold,
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            sensitive_auto_redact: self.config.sensitive_auto_redact,
            invariant_similarity_threshold: DEFAULT_INVARIANT_SIMILARITY_THRESHOLD,
            canonical_invariant_refs: &self.canonical_invariant_refs,
        }
    }

    pub fn socket_path(&self) -> PathBuf {
        self.project_root.join(".succ").join("daemon.sock")
    }

    pub fn store_path(&self) -> PathBuf {
        self.project_root.join(".succ").join("store.db")
    }

    pub fn services(&self) -> Vec<succ_observability::health::ServiceStatus> {
        use succ_observability::health::ServiceStatus;
        vec![
            ServiceStatus { name: "storage".to_string(), healthy: true, detail: None },
            ServiceStatus { name: "embedder".to_string(), healthy: true, detail: None },
            ServiceStatus {
                name: "llm".to_string(),
                healthy: self.llm.is_some(),
                detail: if self.llm.is_none() { Some("no LLM provider configured".to_string()) } else { None },
            },
        ]
    }
}

pub async fn run_consolidation_once(state: &Arc<AppState>) -> SuccResult<succ_idle::ConsolidationReport> {
    let now = Utc::now();
    let candidates = state.store.all_valid(now)?;
    let similarity = state.config.idle_reflection.similarity_for_merge;
    let max = state.config.idle_reflection.max_memories_to_process;
    succ_idle::consolidate(state.store.as_ref(), &candidates, similarity, max)
}
