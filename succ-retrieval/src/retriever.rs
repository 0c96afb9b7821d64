//! Hybrid Retriever (spec.md §4.5): vector search + BM25 lexical search
//! fused with RRF, then an optional centrality boost and a dead-end
//! boost, before sorting and truncating to the caller's limit.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use succ_core::config::{GraphCentralityConfig, RetrievalConfig};
use succ_core::constants::LLM_TIMEOUT_CLASSIFICATION_SECS;
use succ_core::errors::SuccResult;
use succ_core::memory::{Memory, MemoryId, MemoryType};
use succ_core::models::{CentralityScore, Chunk};
use succ_core::traits::embedding::cosine_similarity;
use succ_core::traits::{ChunkCorpus, Embedder, Llm, MemoryStore};

use crate::bm25_index::Bm25Index;
use crate::query_kind::needs_wide_fan_out;
use crate::rrf;

/// Filters applied to the candidate pool alongside the query itself.
#[derive(Debug, Clone, Default)]
pub struct RetrieveOptions {
    pub limit: Option<usize>,
    pub threshold: Option<f64>,
    pub tags: Vec<String>,
    pub since: Option<DateTime<Utc>>,
}

pub struct HybridRetriever {
    config: RetrievalConfig,
    centrality_config: GraphCentralityConfig,
    memory_index: Bm25Index,
    document_index: Bm25Index,
    code_index: Bm25Index,
}

impl HybridRetriever {
    pub fn new(config: RetrievalConfig, centrality_config: GraphCentralityConfig) -> Self {
        Self {
            config,
            centrality_config,
            memory_index: Bm25Index::new(),
            document_index: Bm25Index::new(),
            code_index: Bm25Index::new(),
        }
    }

    pub fn index_memory(&mut self, id: MemoryId, content: &str) {
        self.memory_index.upsert(id.to_string(), content.to_string());
    }

    pub fn remove_memory(&mut self, id: MemoryId) {
        self.memory_index.remove(&id.to_string());
    }

    pub fn index_chunk(&mut self, corpus: ChunkCorpus, id: u64, content: &str) {
        self.index_for(corpus).upsert(id.to_string(), content.to_string());
    }

    pub fn remove_chunk(&mut self, corpus: ChunkCorpus, id: u64) {
        self.index_for(corpus).remove(&id.to_string());
    }

    fn index_for(&mut self, corpus: ChunkCorpus) -> &mut Bm25Index {
        match corpus {
            ChunkCorpus::Document => &mut self.document_index,
            ChunkCorpus::Code => &mut self.code_index,
        }
    }

    fn fan_out(&self, query: &str, limit: usize) -> usize {
        let base = (limit * 4).max(20);
        if needs_wide_fan_out(query) {
            base.max(self.config.counting_query_fan_out)
        } else {
            base
        }
    }

    /// Step 1: optional LLM paraphrase expansion. Falls back to the
    /// original query alone if expansion is disabled, no `Llm` was
    /// injected, or the call fails.
    async fn expand_query(&self, query: &str, llm: Option<&dyn Llm>) -> Vec<String> {
        let mut variants = vec![query.to_string()];
        if !self.config.query_expansion {
            return variants;
        }
        let Some(llm) = llm else {
            return variants;
        };
        let prompt = format!(
            "Rewrite this search query as up to {} alternate phrasings that preserve its meaning. \
             One per line, no numbering, no commentary.\n\nQuery: {query}",
            self.config.max_query_expansions
        );
        match llm.complete(&prompt, LLM_TIMEOUT_CLASSIFICATION_SECS).await {
            Ok(text) => {
                for line in text.lines() {
                    let line = line.trim();
                    if !line.is_empty() && variants.len() <= self.config.max_query_expansions {
                        variants.push(line.to_string());
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "query expansion failed, searching with the original query only");
            }
        }
        variants
    }

    /// Memory retrieval (spec.md §4.5). `stores` is the project store
    /// plus, when the caller wants cross-project results, the global
    /// store — callers own the include-global decision, the retriever
    /// just searches whatever it's handed. `centrality` is the
    /// normalized-degree map from the knowledge graph (C7), required
    /// only when `graph_centrality.enabled`.
    pub async fn retrieve_memories(
        &mut self,
        stores: &[&dyn MemoryStore],
        embedder: &dyn Embedder,
        llm: Option<&dyn Llm>,
        centrality: Option<&HashMap<MemoryId, CentralityScore>>,
        query: &str,
        opts: &RetrieveOptions,
    ) -> SuccResult<Vec<(Memory, f64)>> {
        let limit = opts.limit.unwrap_or(self.config.memory_limit);
        let threshold = opts.threshold.unwrap_or(self.config.memory_threshold);
        let fan_out = self.fan_out(query, limit);

        // Steps 1-2: expand, embed every variant.
        let variants = self.expand_query(query, llm).await;
        let mut query_embeddings = Vec::with_capacity(variants.len());
        for variant in &variants {
            query_embeddings.push(embedder.embed(variant)?);
        }

        // Step 3: vector search >= threshold, max similarity per
        // candidate across query variants and across stores.
        let mut vector_scores: HashMap<MemoryId, f64> = HashMap::new();
        for store in stores {
            for embedding in &query_embeddings {
                for (id, sim) in store.search_by_vector(embedding, fan_out, threshold)? {
                    let entry = vector_scores.entry(id).or_insert(0.0);
                    if sim > *entry {
                        *entry = sim;
                    }
                }
            }
        }
        let mut vector_ranked: Vec<(MemoryId, f64)> = vector_scores.into_iter().collect();
        vector_ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        vector_ranked.truncate(fan_out);
        let vector_list: Vec<String> = vector_ranked.iter().map(|(id, _)| id.to_string()).collect();

        // Step 4: BM25 lexical top-N.
        let bm25_list: Vec<String> = self
            .memory_index
            .search(query, fan_out)
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        // Step 5: RRF fusion.
        let fused = rrf::fuse(&[&bm25_list, &vector_list], self.config.rrf_k);
        let candidate_ids: Vec<MemoryId> = fused.iter().filter_map(|(id, _)| id.parse().ok()).collect();
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }

        let memories = fetch_memories(stores, &candidate_ids)?;

        let mut scored: Vec<(Memory, f64)> = Vec::with_capacity(fused.len());
        for (id_str, mut score) in fused {
            let Ok(id) = id_str.parse::<MemoryId>() else { continue };
            let Some(memory) = memories.get(&id) else { continue };

            if !opts.tags.is_empty() && !opts.tags.iter().all(|t| memory.has_tag(t)) {
                continue;
            }
            if let Some(since) = opts.since {
                if memory.created_at < since {
                    continue;
                }
            }

            // Step 6: centrality boost (memories only).
            if self.centrality_config.enabled {
                if let Some(c) = centrality.and_then(|c| c.get(&id)) {
                    score = (score + self.centrality_config.boost_weight * c.normalized_degree).min(1.0);
                }
            }

            // Step 7: dead-end boost.
            if memory.memory_type == MemoryType::DeadEnd || memory.has_tag("dead-end") {
                score = (score + self.config.dead_end_boost).min(1.0);
            }

            scored.push((memory.clone(), score));
        }

        // Step 8: sort + truncate.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(limit);

        // Step 9: atomically record access for the returned set.
        let returned_ids: Vec<MemoryId> = scored.iter().map(|(m, _)| m.id).collect();
        if !returned_ids.is_empty() {
            for store in stores {
                store.increment_access_batch(&returned_ids)?;
            }
        }

        Ok(scored)
    }

    /// Document/code retrieval. Code search always skips query
    /// expansion (spec.md §4.5 step 1) since identifier-heavy queries
    /// don't benefit from paraphrasing; there is no centrality or
    /// dead-end boost, both memory-only concepts.
    pub async fn retrieve_chunks(
        &mut self,
        store: &dyn MemoryStore,
        embedder: &dyn Embedder,
        llm: Option<&dyn Llm>,
        corpus: ChunkCorpus,
        query: &str,
        opts: &RetrieveOptions,
    ) -> SuccResult<Vec<(Chunk, f64)>> {
        let limit = opts.limit.unwrap_or(self.config.document_limit);
        let threshold = opts.threshold.unwrap_or(self.config.document_threshold);
        let fan_out = self.fan_out(query, limit);

        let variants = match corpus {
            ChunkCorpus::Code => vec![query.to_string()],
            ChunkCorpus::Document => self.expand_query(query, llm).await,
        };
        let mut query_embeddings = Vec::with_capacity(variants.len());
        for variant in &variants {
            query_embeddings.push(embedder.embed(variant)?);
        }

        let all = store.all_chunks(corpus)?;

        let mut vector_scored: Vec<(u64, f64)> = Vec::new();
        for chunk in &all {
            if chunk.embedding.is_empty() {
                continue;
            }
            let best = query_embeddings
                .iter()
                .map(|q| cosine_similarity(q, &chunk.embedding))
                .fold(0.0_f64, f64::max);
            if best >= threshold {
                vector_scored.push((chunk.id, best));
            }
        }
        vector_scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        vector_scored.truncate(fan_out);
        let vector_list: Vec<String> = vector_scored.iter().map(|(id, _)| id.to_string()).collect();

        let bm25_list: Vec<String> = self
            .index_for(corpus)
            .search(query, fan_out)
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        let fused = rrf::fuse(&[&bm25_list, &vector_list], self.config.rrf_k);

        let by_id: HashMap<u64, &Chunk> = all.iter().map(|c| (c.id, c)).collect();
        let mut results: Vec<(Chunk, f64)> = fused
            .into_iter()
            .filter_map(|(id, score)| id.parse::<u64>().ok().and_then(|id| by_id.get(&id)).map(|c| ((*c).clone(), score)))
            .collect();
        results.truncate(limit);
        Ok(results)
    }
}

fn fetch_memories(stores: &[&dyn MemoryStore], ids: &[MemoryId]) -> SuccResult<HashMap<MemoryId, Memory>> {
    let mut map = HashMap::new();
    for store in stores {
        for memory in store.get_bulk(ids)? {
            map.entry(memory.id).or_insert(memory);
        }
    }
    Ok(map)
}
