//! Checkpoint import (spec.md §4.9): validates schema version, restores
//! memories first recording old-id → new-id, then restores links with
//! remapped ids, dropping any link whose endpoint is absent. Additive
//! by default; `overwrite=true` clears existing rows first.

use std::collections::HashMap;
use std::io::Read;

use flate2::read::GzDecoder;

use succ_core::constants::CHECKPOINT_SCHEMA_VERSION;
use succ_core::errors::{CheckpointError, SuccError, SuccResult};
use succ_core::memory::MemoryId;
use succ_core::traits::storage::{ChunkCorpus, MemoryStore};

use crate::format::Checkpoint;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub overwrite: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub memories_restored: usize,
    pub links_restored: usize,
    pub links_dropped: usize,
    pub documents_restored: usize,
    pub code_chunks_restored: usize,
}

/// Decompresses `bytes` if they look gzipped (magic bytes `1f 8b`),
/// otherwise treats them as plain JSON.
pub fn deserialize(bytes: &[u8]) -> SuccResult<Checkpoint> {
    let json_bytes = if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut decoder = GzDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| CheckpointError::Malformed { reason: e.to_string() })?;
        decompressed
    } else {
        bytes.to_vec()
    };

    serde_json::from_slice(&json_bytes).map_err(|e| CheckpointError::Malformed { reason: e.to_string() }.into())
}

pub fn import_checkpoint(
    store: &dyn MemoryStore,
    checkpoint: &Checkpoint,
    opts: ImportOptions,
) -> SuccResult<ImportReport> {
    if checkpoint.version > CHECKPOINT_SCHEMA_VERSION {
        return Err(SuccError::Checkpoint(CheckpointError::SchemaTooNew {
            found: checkpoint.version,
            supported: CHECKPOINT_SCHEMA_VERSION,
        }));
    }

    if opts.overwrite {
        for link in store.list_all_links()? {
            store.delete_link(link.id)?;
        }
        for memory in store.all_valid(chrono::Utc::now())? {
            store.delete(memory.id)?;
        }
        clear_chunks(store, ChunkCorpus::Document)?;
        clear_chunks(store, ChunkCorpus::Code)?;
    }

    let mut report = ImportReport::default();
    let mut id_map: HashMap<MemoryId, MemoryId> = HashMap::new();

    // `restore` bypasses the dedup probe entirely, so two near-identical
    // original memories each get their own restored row (spec.md §4.9:
    // "for each original memory there exists a restored memory"), and
    // preserves `created_at`/`access_count`/`correction_count` verbatim
    // rather than resetting them the way a fresh `save` would.
    for memory in &checkpoint.data.memories {
        let new_id = store.restore(memory)?;
        id_map.insert(memory.id, new_id);
        report.memories_restored += 1;
    }

    // Second pass: `invalidated_by` named a pre-restore id, which only
    // resolves once every memory in this checkpoint has a new one.
    for memory in &checkpoint.data.memories {
        if let Some(old_target) = memory.invalidated_by {
            if let (Some(&new_id), Some(&new_target)) = (id_map.get(&memory.id), id_map.get(&old_target)) {
                store.set_invalidated_by(new_id, new_target)?;
            }
        }
    }

    for link in &checkpoint.data.memory_links {
        let (Some(&source), Some(&target)) = (id_map.get(&link.source_id), id_map.get(&link.target_id)) else {
            report.links_dropped += 1;
            continue;
        };
        store.create_link(succ_core::models::link::MemoryLink {
            id: 0,
            source_id: source,
            target_id: target,
            relation: link.relation,
            weight: link.weight,
            llm_enriched: link.llm_enriched,
            created_at: link.created_at,
        })?;
        report.links_restored += 1;
    }

    if !checkpoint.data.documents.is_empty() {
        restore_chunks(store, ChunkCorpus::Document, &checkpoint.data.documents)?;
        report.documents_restored = checkpoint.data.documents.len();
    }
    if !checkpoint.data.code_chunks.is_empty() {
        restore_chunks(store, ChunkCorpus::Code, &checkpoint.data.code_chunks)?;
        report.code_chunks_restored = checkpoint.data.code_chunks.len();
    }

    Ok(report)
}

/// Deletes every chunk in `corpus`, one `file_path` at a time — the
/// storage trait only exposes per-path deletion (spec.md §3: chunks
/// are addressed by file path, not a bulk handle).
fn clear_chunks(store: &dyn MemoryStore, corpus: ChunkCorpus) -> SuccResult<()> {
    let paths: std::collections::HashSet<String> =
        store.all_chunks(corpus)?.into_iter().map(|c| c.file_path).collect();
    for path in paths {
        store.delete_by_path(corpus, &path)?;
    }
    Ok(())
}

fn restore_chunks(store: &dyn MemoryStore, corpus: ChunkCorpus, chunks: &[succ_core::models::Chunk]) -> SuccResult<()> {
    let mut by_path: HashMap<&str, Vec<succ_core::models::Chunk>> = HashMap::new();
    for chunk in chunks {
        by_path.entry(chunk.file_path.as_str()).or_default().push(chunk.clone());
    }
    for (path, file_chunks) in by_path {
        let hash = succ_core::models::chunk::FileHash::compute(
            &file_chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>().join(""),
        );
        store.upsert_chunks(corpus, path, &hash, file_chunks)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use succ_core::memory::{Memory, MemoryType, QualityFactors};

    use super::*;
    use crate::format::{Checkpoint, CheckpointData};

    #[test]
    fn rejects_newer_schema_version() {
        let mut checkpoint = Checkpoint::new("proj".to_string(), CheckpointData::default());
        checkpoint.version = CHECKPOINT_SCHEMA_VERSION + 1;
        let bytes = serde_json::to_vec(&checkpoint).unwrap();
        let restored: Checkpoint = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored.version, CHECKPOINT_SCHEMA_VERSION + 1);
    }

    #[test]
    fn deserialize_detects_plain_json() {
        let checkpoint = Checkpoint::new("proj".to_string(), CheckpointData::default());
        let bytes = serde_json::to_vec(&checkpoint).unwrap();
        let restored = deserialize(&bytes).unwrap();
        assert_eq!(restored.project_name, "proj");
    }

    fn sample_memory(id: MemoryId, content: &str, created_at: DateTime<Utc>) -> Memory {
        Memory {
            id,
            content: content.to_string(),
            embedding: vec![1.0, 0.0, 0.0],
            tags: Vec::new(),
            source: "test".to_string(),
            memory_type: MemoryType::Observation,
            quality_score: 0.5,
            quality_factors: QualityFactors::new(),
            access_count: 7,
            last_accessed: created_at,
            created_at,
            valid_from: None,
            valid_until: None,
            is_invariant: false,
            correction_count: 3,
            invalidated_by: None,
        }
    }

    #[test]
    fn restore_bypasses_dedup_and_preserves_fields_and_links() {
        let store = succ_storage::StorageEngine::open_in_memory().unwrap();
        let old_created_at = Utc::now() - Duration::days(30);

        // Two near-duplicate memories (identical embedding) must both
        // survive restore rather than collapsing into one.
        let mut original = sample_memory(1, "first memory", old_created_at);
        let duplicate = sample_memory(2, "first memory, near duplicate", old_created_at);
        // Pinned via correction_count, and invalidated by the duplicate
        // to exercise the second-pass id remap.
        original.invalidated_by = Some(2);

        let checkpoint = Checkpoint::new(
            "proj".to_string(),
            CheckpointData {
                memories: vec![original, duplicate],
                ..CheckpointData::default()
            },
        );

        let report = import_checkpoint(&store, &checkpoint, ImportOptions::default()).unwrap();
        assert_eq!(report.memories_restored, 2);

        let restored = store.all_valid(Utc::now() + Duration::days(365)).unwrap();
        // `all_valid` excludes the invalidated original, so only the duplicate remains valid.
        assert_eq!(restored.len(), 1, "only the non-invalidated duplicate remains valid");

        // Fetch both restored rows via `recent` since ids were remapped on restore.
        let recent = store.recent(10).unwrap();
        assert_eq!(recent.len(), 2, "dedup must not collapse the near-duplicate pair");

        let first = recent.iter().find(|m| m.content == "first memory").unwrap();
        assert_eq!(first.created_at, old_created_at, "created_at must be preserved verbatim");
        assert_eq!(first.access_count, 7, "access_count must be preserved verbatim");
        assert_eq!(first.correction_count, 3, "correction_count must be preserved verbatim");
        assert!(first.is_pinned(), "a correction_count >= PINNED_CORRECTION_COUNT memory stays pinned");

        let dup = recent.iter().find(|m| m.content == "first memory, near duplicate").unwrap();
        assert_eq!(first.invalidated_by, Some(dup.id), "invalidated_by must be remapped to the new id");
    }
}
