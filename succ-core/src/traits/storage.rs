use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::SuccResult;
use crate::memory::{Memory, MemoryId, MemoryType, QualityFactors};
use crate::models::{Chunk, MemoryLink, RelationType, TokenEvent};

/// Which chunk corpus an operation targets (spec.md §3: document chunks
/// and code chunks share a shape but live in distinct tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkCorpus {
    Document,
    Code,
}

/// Per-save options (spec.md §3 fields not implied by content+embedding).
#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub tags: Vec<String>,
    pub source: String,
    pub memory_type: MemoryType,
    /// Computed upstream by the quality scorer (C10) before the write
    /// path reaches storage; storage persists it verbatim.
    pub quality_score: f64,
    pub quality_factors: QualityFactors,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_invariant: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            source: String::new(),
            memory_type: MemoryType::Observation,
            quality_score: 0.0,
            quality_factors: QualityFactors::new(),
            valid_from: None,
            valid_until: None,
            is_invariant: false,
        }
    }
}

/// Outcome of `save`: either a freshly written memory or a pointer to
/// the existing duplicate (spec.md §4.1 dedup semantics).
#[derive(Debug, Clone, Copy)]
pub struct SaveOutcome {
    pub id: MemoryId,
    pub duplicate: bool,
}

/// One item of a `save_batch` call.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub content: String,
    pub embedding: Vec<f32>,
    pub opts: SaveOptions,
}

/// Why a `save_batch` item was skipped.
#[derive(Debug, Clone)]
pub enum SkipReason {
    DuplicateOfExisting(MemoryId),
    DuplicateWithinBatch(usize),
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub saved: Vec<MemoryId>,
    pub skipped: Vec<(usize, SkipReason)>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StaleReport {
    pub total: usize,
    pub stale: usize,
    pub deleted: usize,
}

/// In-memory, monotonic, not synchronized across processes (spec.md §5).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub memories_created: u64,
    pub memories_deleted: u64,
    pub searches_run: u64,
    pub recalls_run: u64,
}

/// Uniform contract over a relational store + vector index (C1). Owns
/// the store handle exclusively; every other component takes a borrowed
/// reference and never mutates schema (spec.md §3 Ownership).
pub trait MemoryStore: Send + Sync {
    // --- Memory CRUD + dedup ---
    fn save(&self, content: &str, embedding: &[f32], opts: SaveOptions) -> SuccResult<SaveOutcome>;
    fn save_batch(&self, items: &[BatchItem], dedup_threshold: f64) -> SuccResult<BatchResult>;
    /// Inserts `memory` verbatim: no dedup probe, every field (content,
    /// `created_at`, `access_count`, `correction_count`, `is_invariant`)
    /// preserved as given. `memory.invalidated_by` and `memory.id` are
    /// ignored — checkpoint restore remaps ids in a second pass via
    /// `set_invalidated_by` once every memory has a new id (spec.md
    /// §4.9: "for each original memory there exists a restored memory",
    /// and a pinned-by-correction memory must stay pinned on restore).
    fn restore(&self, memory: &Memory) -> SuccResult<MemoryId>;
    /// Sets `invalidated_by` directly, without touching
    /// `correction_count` (already restored verbatim by `restore`).
    fn set_invalidated_by(&self, id: MemoryId, invalidated_by: MemoryId) -> SuccResult<()>;
    fn find_similar(&self, embedding: &[f32], threshold: f64) -> SuccResult<Option<(MemoryId, f64)>>;
    fn search_by_vector(
        &self,
        embedding: &[f32],
        k: usize,
        threshold: f64,
    ) -> SuccResult<Vec<(MemoryId, f64)>>;
    fn get_by_id(&self, id: MemoryId) -> SuccResult<Option<Memory>>;
    fn get_bulk(&self, ids: &[MemoryId]) -> SuccResult<Vec<Memory>>;
    fn delete(&self, id: MemoryId) -> SuccResult<()>;
    fn update_tags(&self, id: MemoryId, tags: Vec<String>) -> SuccResult<()>;
    fn increment_access_batch(&self, ids: &[MemoryId]) -> SuccResult<()>;
    fn increment_correction_count(&self, id: MemoryId, invalidated: MemoryId) -> SuccResult<()>;
    /// Bumps `correction_count` alone, without invalidating anything.
    /// Used by reflection synthesis to reinforce an existing
    /// pattern/learning that a new cluster re-derived (spec.md §4.8
    /// job 2), distinct from the supersedes correction protocol.
    fn reinforce(&self, id: MemoryId) -> SuccResult<()>;
    fn all_valid(&self, now: DateTime<Utc>) -> SuccResult<Vec<Memory>>;
    fn count_by_type(&self) -> SuccResult<Vec<(MemoryType, usize)>>;
    fn recent(&self, limit: usize) -> SuccResult<Vec<Memory>>;

    // --- Document / code chunks ---
    fn upsert_chunks(
        &self,
        corpus: ChunkCorpus,
        file_path: &str,
        content_hash: &str,
        chunks: Vec<Chunk>,
    ) -> SuccResult<()>;
    fn delete_by_path(&self, corpus: ChunkCorpus, file_path: &str) -> SuccResult<()>;
    fn chunks_for_path(&self, corpus: ChunkCorpus, file_path: &str) -> SuccResult<Vec<Chunk>>;
    fn all_chunks(&self, corpus: ChunkCorpus) -> SuccResult<Vec<Chunk>>;
    fn get_stale_files(&self, corpus: ChunkCorpus, project_root: &Path) -> SuccResult<StaleReport>;

    // --- Links ---
    fn create_link(&self, link: MemoryLink) -> SuccResult<MemoryLink>;
    fn delete_link(&self, id: u64) -> SuccResult<()>;
    fn update_link(&self, id: u64, relation: RelationType, weight: f64, llm_enriched: bool) -> SuccResult<()>;
    fn links_for(&self, memory_id: MemoryId) -> SuccResult<(Vec<MemoryLink>, Vec<MemoryLink>)>;
    fn list_all_links(&self) -> SuccResult<Vec<MemoryLink>>;
    fn link_exists(&self, a: MemoryId, b: MemoryId) -> SuccResult<bool>;

    // --- Stats ---
    fn session_stats(&self) -> SessionStats;
    fn record_token_event(&self, event: TokenEvent) -> SuccResult<()>;

    // --- Maintenance ---
    fn vacuum(&self) -> SuccResult<()>;
}
