//! `StorageEngine` — owns the `ConnectionPool`, implements `MemoryStore`.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use succ_core::constants::DEFAULT_DEDUP_THRESHOLD;
use succ_core::errors::{StorageError, SuccError, SuccResult};
use succ_core::memory::{Memory, MemoryId, MemoryType};
use succ_core::models::{Chunk, MemoryLink, RelationType, TokenEvent};
use succ_core::traits::{
    BatchItem, BatchResult, ChunkCorpus, MemoryStore, SaveOptions, SaveOutcome, SessionStats,
    SkipReason, StaleReport,
};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

/// In-memory, per-process session counters (spec.md §5: "not
/// synchronized across processes").
#[derive(Default)]
struct SessionCounters {
    memories_created: AtomicU64,
    memories_deleted: AtomicU64,
    searches_run: AtomicU64,
    recalls_run: AtomicU64,
}

pub struct StorageEngine {
    pool: ConnectionPool,
    use_read_pool: bool,
    counters: SessionCounters,
}

impl StorageEngine {
    pub fn open(path: &Path) -> SuccResult<Self> {
        let pool = ConnectionPool::open(path, 4)?;
        let engine = Self { pool, use_read_pool: true, counters: SessionCounters::default() };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn open_in_memory() -> SuccResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self { pool, use_read_pool: false, counters: SessionCounters::default() };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> SuccResult<()> {
        self.pool.writer.with_conn(|conn| migrations::run_migrations(conn))
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn with_reader<F, T>(&self, f: F) -> SuccResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> SuccResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }

    /// Rejects an embedding whose length doesn't match the dimension
    /// already committed to the store (spec.md §3/§8: "embedding.len ==
    /// D; mixing dimensions is rejected at write time").
    fn check_dimension(&self, embedding: &[f32]) -> SuccResult<()> {
        let expected = self.with_reader(|conn| queries::memory_crud::expected_dimension(conn))?;
        if let Some(expected) = expected {
            if embedding.len() != expected {
                return Err(SuccError::Storage(StorageError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                }));
            }
        }
        Ok(())
    }

    fn insert_new_memory(&self, content: &str, embedding: &[f32], opts: &SaveOptions, now: DateTime<Utc>) -> SuccResult<MemoryId> {
        let memory = Memory {
            id: 0,
            content: content.to_string(),
            embedding: embedding.to_vec(),
            tags: opts.tags.clone(),
            source: opts.source.clone(),
            memory_type: opts.memory_type,
            quality_score: opts.quality_score,
            quality_factors: opts.quality_factors.clone(),
            access_count: 0,
            last_accessed: now,
            created_at: now,
            valid_from: opts.valid_from,
            valid_until: opts.valid_until,
            is_invariant: opts.is_invariant,
            correction_count: 0,
            invalidated_by: None,
        };
        self.pool.writer.with_conn(|conn| queries::memory_crud::insert_memory(conn, &memory))
    }
}

impl MemoryStore for StorageEngine {
    fn save(&self, content: &str, embedding: &[f32], opts: SaveOptions) -> SuccResult<SaveOutcome> {
        self.check_dimension(embedding)?;
        if let Some((id, _)) = self.find_similar(embedding, DEFAULT_DEDUP_THRESHOLD)? {
            return Ok(SaveOutcome { id, duplicate: true });
        }
        let id = self.insert_new_memory(content, embedding, &opts, Utc::now())?;
        self.counters.memories_created.fetch_add(1, Ordering::Relaxed);
        Ok(SaveOutcome { id, duplicate: false })
    }

    fn restore(&self, memory: &Memory) -> SuccResult<MemoryId> {
        self.check_dimension(&memory.embedding)?;
        // `invalidated_by` named a pre-restore id; the caller remaps it
        // via `set_invalidated_by` once every memory has a new one.
        let mut to_insert = memory.clone();
        to_insert.invalidated_by = None;
        let id = self.pool.writer.with_conn(|conn| queries::memory_crud::insert_memory(conn, &to_insert))?;
        self.counters.memories_created.fetch_add(1, Ordering::Relaxed);
        Ok(id)
    }

    fn set_invalidated_by(&self, id: MemoryId, invalidated_by: MemoryId) -> SuccResult<()> {
        self.pool.writer.with_conn(|conn| queries::memory_crud::set_invalidated_by(conn, id, invalidated_by))
    }

    fn save_batch(&self, items: &[BatchItem], dedup_threshold: f64) -> SuccResult<BatchResult> {
        let mut result = BatchResult::default();
        let mut batch_embeddings: Vec<(usize, Vec<f32>)> = Vec::new();
        let now = Utc::now();

        for (idx, item) in items.iter().enumerate() {
            self.check_dimension(&item.embedding)?;
            let within_batch_dup = batch_embeddings
                .iter()
                .find(|(_, e)| queries::blob::cosine_similarity(e, &item.embedding) >= dedup_threshold)
                .map(|(prior_idx, _)| *prior_idx);

            if let Some(prior_idx) = within_batch_dup {
                result.skipped.push((idx, SkipReason::DuplicateWithinBatch(prior_idx)));
                continue;
            }

            if let Some((id, _)) = self.find_similar(&item.embedding, dedup_threshold)? {
                result.skipped.push((idx, SkipReason::DuplicateOfExisting(id)));
                continue;
            }

            let id = self.insert_new_memory(&item.content, &item.embedding, &item.opts, now)?;
            self.counters.memories_created.fetch_add(1, Ordering::Relaxed);
            result.saved.push(id);
            batch_embeddings.push((idx, item.embedding.clone()));
        }

        Ok(result)
    }

    fn find_similar(&self, embedding: &[f32], threshold: f64) -> SuccResult<Option<(MemoryId, f64)>> {
        self.with_reader(|conn| queries::vector_search::find_similar(conn, embedding, threshold))
    }

    fn search_by_vector(&self, embedding: &[f32], k: usize, threshold: f64) -> SuccResult<Vec<(MemoryId, f64)>> {
        self.counters.searches_run.fetch_add(1, Ordering::Relaxed);
        self.with_reader(|conn| queries::vector_search::search_by_vector(conn, embedding, k, threshold))
    }

    fn get_by_id(&self, id: MemoryId) -> SuccResult<Option<Memory>> {
        self.with_reader(|conn| queries::memory_crud::get_memory(conn, id))
    }

    fn get_bulk(&self, ids: &[MemoryId]) -> SuccResult<Vec<Memory>> {
        self.with_reader(|conn| queries::memory_crud::get_bulk(conn, ids))
    }

    fn delete(&self, id: MemoryId) -> SuccResult<()> {
        self.pool.writer.with_conn(|conn| queries::memory_crud::delete_memory(conn, id))?;
        self.counters.memories_deleted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn update_tags(&self, id: MemoryId, tags: Vec<String>) -> SuccResult<()> {
        self.pool.writer.with_conn(|conn| queries::memory_crud::update_tags(conn, id, &tags))
    }

    fn increment_access_batch(&self, ids: &[MemoryId]) -> SuccResult<()> {
        self.counters.recalls_run.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        self.pool.writer.with_conn(|conn| queries::memory_crud::increment_access_batch(conn, ids, now))
    }

    fn increment_correction_count(&self, id: MemoryId, invalidated: MemoryId) -> SuccResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::increment_correction_count(conn, id, invalidated))
    }

    fn reinforce(&self, id: MemoryId) -> SuccResult<()> {
        self.pool.writer.with_conn(|conn| queries::memory_crud::reinforce(conn, id))
    }

    fn all_valid(&self, now: DateTime<Utc>) -> SuccResult<Vec<Memory>> {
        self.with_reader(|conn| queries::memory_crud::all_valid(conn, now))
    }

    fn count_by_type(&self) -> SuccResult<Vec<(MemoryType, usize)>> {
        self.with_reader(queries::memory_crud::count_by_type)
    }

    fn recent(&self, limit: usize) -> SuccResult<Vec<Memory>> {
        self.with_reader(|conn| queries::memory_crud::recent(conn, limit))
    }

    fn upsert_chunks(&self, corpus: ChunkCorpus, file_path: &str, content_hash: &str, chunks: Vec<Chunk>) -> SuccResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::chunk_ops::upsert_chunks(conn, corpus, file_path, content_hash, chunks))
    }

    fn delete_by_path(&self, corpus: ChunkCorpus, file_path: &str) -> SuccResult<()> {
        self.pool.writer.with_conn(|conn| queries::chunk_ops::delete_by_path(conn, corpus, file_path))
    }

    fn chunks_for_path(&self, corpus: ChunkCorpus, file_path: &str) -> SuccResult<Vec<Chunk>> {
        self.with_reader(|conn| queries::chunk_ops::chunks_for_path(conn, corpus, file_path))
    }

    fn all_chunks(&self, corpus: ChunkCorpus) -> SuccResult<Vec<Chunk>> {
        self.with_reader(|conn| queries::chunk_ops::all_chunks(conn, corpus))
    }

    fn get_stale_files(&self, corpus: ChunkCorpus, project_root: &Path) -> SuccResult<StaleReport> {
        self.pool.writer.with_conn(|conn| queries::chunk_ops::get_stale_files(conn, corpus, project_root))
    }

    fn create_link(&self, link: MemoryLink) -> SuccResult<MemoryLink> {
        self.pool.writer.with_conn(|conn| queries::link_ops::create_link(conn, link))
    }

    fn delete_link(&self, id: u64) -> SuccResult<()> {
        self.pool.writer.with_conn(|conn| queries::link_ops::delete_link(conn, id))
    }

    fn update_link(&self, id: u64, relation: RelationType, weight: f64, llm_enriched: bool) -> SuccResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::link_ops::update_link(conn, id, relation, weight, llm_enriched))
    }

    fn links_for(&self, memory_id: MemoryId) -> SuccResult<(Vec<MemoryLink>, Vec<MemoryLink>)> {
        self.with_reader(|conn| queries::link_ops::links_for(conn, memory_id))
    }

    fn list_all_links(&self) -> SuccResult<Vec<MemoryLink>> {
        self.with_reader(queries::link_ops::list_all_links)
    }

    fn link_exists(&self, a: MemoryId, b: MemoryId) -> SuccResult<bool> {
        self.with_reader(|conn| queries::link_ops::link_exists(conn, a, b))
    }

    fn session_stats(&self) -> SessionStats {
        SessionStats {
            memories_created: self.counters.memories_created.load(Ordering::Relaxed),
            memories_deleted: self.counters.memories_deleted.load(Ordering::Relaxed),
            searches_run: self.counters.searches_run.load(Ordering::Relaxed),
            recalls_run: self.counters.recalls_run.load(Ordering::Relaxed),
        }
    }

    fn record_token_event(&self, event: TokenEvent) -> SuccResult<()> {
        self.pool.writer.with_conn(|conn| queries::token_events::record(conn, &event))
    }

    fn vacuum(&self) -> SuccResult<()> {
        self.pool.writer.with_conn(queries::maintenance::full_vacuum)
    }
}

#[cfg(test)]
mod tests {
    use succ_core::traits::storage::SaveOptions;

    use super::*;

    #[test]
    fn save_establishes_the_store_dimension() {
        let store = StorageEngine::open_in_memory().unwrap();
        let outcome = store.save("first memory", &[1.0, 0.0, 0.0], SaveOptions::default()).unwrap();
        assert!(!outcome.duplicate);
    }

    #[test]
    fn save_rejects_a_mismatched_dimension() {
        let store = StorageEngine::open_in_memory().unwrap();
        store.save("first memory", &[1.0, 0.0, 0.0], SaveOptions::default()).unwrap();

        let err = store.save("second memory, wrong dims", &[1.0, 0.0], SaveOptions::default()).unwrap_err();
        match err {
            SuccError::Storage(StorageError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn save_batch_rejects_a_mismatched_dimension() {
        let store = StorageEngine::open_in_memory().unwrap();
        store.save("first memory", &[1.0, 0.0, 0.0], SaveOptions::default()).unwrap();

        let items = vec![BatchItem {
            content: "mismatched".to_string(),
            embedding: vec![1.0, 0.0],
            opts: SaveOptions::default(),
        }];
        let err = store.save_batch(&items, DEFAULT_DEDUP_THRESHOLD).unwrap_err();
        assert_eq!(err.kind(), "Validation");
    }
}
