//! System-wide constants. Values called out as "magic numbers without
//! derivation" in spec.md's Open Questions are still exposed here as
//! documented defaults, but every call site accepts an override through
//! `SuccConfig` rather than hard-coding them.

/// succ engine version (embedded in checkpoint exports).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Checkpoint schema version this engine writes and the newest it reads.
pub const CHECKPOINT_SCHEMA_VERSION: u32 = 1;

/// Default similarity threshold for save-path dedup (`find_similar`).
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.92;

/// Default quality-score admission threshold for the write path.
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 0.3;

/// Default retrieval score threshold for memories.
pub const DEFAULT_MEMORY_THRESHOLD: f64 = 0.3;

/// Default retrieval score threshold for documents/code.
pub const DEFAULT_DOCUMENT_THRESHOLD: f64 = 0.5;

/// Default retrieval limit (k).
pub const DEFAULT_RETRIEVAL_LIMIT: usize = 5;

/// Reciprocal-rank fusion smoothing constant.
pub const RRF_K: u32 = 60;

/// Centrality boost weight (β in spec.md §4.5 step 6).
pub const DEFAULT_CENTRALITY_BOOST_WEIGHT: f64 = 0.1;

/// Dead-end retrieval boost (δ in spec.md §4.5 step 7). Open Question in
/// spec.md §9 flags this as a magic number — kept configurable via
/// `RetrievalConfig::dead_end_boost`.
pub const DEFAULT_DEAD_END_BOOST: f64 = 0.15;

/// Auto-link similarity threshold for the knowledge graph (C7).
pub const DEFAULT_AUTO_LINK_THRESHOLD: f64 = 0.75;

/// Minimum co-occurrence count for proximity linking. Open Question in
/// spec.md §9 flags this as a magic number — kept configurable via
/// `GraphConfig::min_cooccurrence`.
pub const DEFAULT_MIN_COOCCURRENCE: u32 = 2;

/// Consolidation merge-candidate similarity threshold.
pub const DEFAULT_SIMILARITY_FOR_MERGE: f64 = 0.85;

/// Reflection dedup threshold (lower than write-path dedup to catch
/// paraphrases of existing patterns/learnings).
pub const DEFAULT_REFLECTION_DEDUP_THRESHOLD: f64 = 0.80;

/// Diversity filter cosine ceiling for working-set assembly.
pub const DEFAULT_DIVERSITY_THRESHOLD: f64 = 0.85;

/// Invariant-detection embedding similarity threshold.
pub const DEFAULT_INVARIANT_SIMILARITY_THRESHOLD: f64 = 0.55;

/// Correction count at which a memory becomes pinned (Tier 1), absent
/// `is_invariant`.
pub const PINNED_CORRECTION_COUNT: u32 = 2;

/// Community size floor for reflection synthesis eligibility.
pub const MIN_COMMUNITY_SIZE_FOR_REFLECTION: usize = 5;

/// Max unreflected observations pulled per cluster for synthesis.
pub const MAX_OBSERVATIONS_PER_CLUSTER: usize = 15;

/// Max chunk size in characters before size-capped sub-chunking (C3).
pub const MAX_CHUNK_CHARS: usize = 4000;

/// Default text-chunker chunk size (characters).
pub const DEFAULT_CHUNK_SIZE: usize = 1200;

/// Default text-chunker overlap (characters).
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// BM25 k1 parameter.
pub const BM25_K1: f32 = 1.2;

/// BM25 b parameter.
pub const BM25_B: f32 = 0.75;

/// Embedding worker pool shutdown drain deadline (seconds).
pub const POOL_SHUTDOWN_DEADLINE_SECS: u64 = 5;

/// Embedding worker pool hard cap, independent of CPU count (spec.md §4.2).
pub const MAX_EMBEDDING_POOL_WORKERS: usize = 8;

/// Assumed resident-memory cost per embedding worker (model context +
/// batch buffers), used to cap pool size under memory pressure.
pub const EMBEDDING_WORKER_MEM_BUDGET_BYTES: u64 = 512 * 1024 * 1024;

/// Idle-job synchronous wall-clock slice (seconds), per spec.md §5.
pub const IDLE_SYNC_SLICE_SECS: u64 = 25;

/// Daemon zombie-prevention idle timeout (minutes).
pub const DAEMON_IDLE_TIMEOUT_MINS: u64 = 60;

/// LLM call timeouts (seconds), component-specific per spec.md §5.
pub const LLM_TIMEOUT_CLASSIFICATION_SECS: u64 = 30;
pub const LLM_TIMEOUT_BRIEFING_SECS: u64 = 45;
pub const LLM_TIMEOUT_SUMMARY_SECS: u64 = 60;
