use serde::{Deserialize, Serialize};

use crate::constants;

/// Hybrid Retriever configuration (spec.md §4.5). Per-corpus
/// limit/threshold defaults plus the knobs for the steps that aren't
/// already owned by another config struct (`graph_centrality` covers
/// step 6's boost weight).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub memory_limit: usize,
    pub memory_threshold: f64,
    pub document_limit: usize,
    pub document_threshold: f64,
    /// RRF smoothing constant `k` in `score = Σ 1/(k + rank)`.
    pub rrf_k: u32,
    /// Step 1: expand the query into paraphrases via the injected `Llm`
    /// before embedding. Code search always skips this (spec.md §4.5).
    pub query_expansion: bool,
    pub max_query_expansions: usize,
    pub dead_end_boost: f64,
    /// Pre-fusion fan-out for counting/multi-session queries (spec.md
    /// §4.5 query-type heuristics) — raises the per-list candidate
    /// count before RRF so a "how many times did we..." query isn't
    /// truncated to the default top-N too early.
    pub counting_query_fan_out: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            memory_limit: constants::DEFAULT_RETRIEVAL_LIMIT,
            memory_threshold: constants::DEFAULT_MEMORY_THRESHOLD,
            document_limit: constants::DEFAULT_RETRIEVAL_LIMIT,
            document_threshold: constants::DEFAULT_DOCUMENT_THRESHOLD,
            rrf_k: constants::RRF_K,
            query_expansion: true,
            max_query_expansions: 5,
            dead_end_boost: constants::DEFAULT_DEAD_END_BOOST,
            counting_query_fan_out: 20,
        }
    }
}
