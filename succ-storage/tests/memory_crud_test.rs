use chrono::Utc;

use succ_core::memory::MemoryType;
use succ_core::traits::{BatchItem, ChunkCorpus, MemoryStore, SaveOptions};
use succ_storage::StorageEngine;

fn opts() -> SaveOptions {
    SaveOptions {
        tags: vec!["style".to_string()],
        source: "test".to_string(),
        memory_type: MemoryType::Observation,
        quality_score: 0.6,
        ..Default::default()
    }
}

#[test]
fn save_then_get_round_trips_content() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let outcome = engine.save("prefer tabs over spaces", &[0.1, 0.2, 0.3], opts()).unwrap();
    assert!(!outcome.duplicate);

    let memory = engine.get_by_id(outcome.id).unwrap().unwrap();
    assert_eq!(memory.content, "prefer tabs over spaces");
    assert_eq!(memory.tags, vec!["style".to_string()]);
    assert!((memory.quality_score - 0.6).abs() < 1e-9);
}

#[test]
fn save_dedups_near_identical_embeddings() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let first = engine.save("use rustfmt", &[1.0, 0.0, 0.0], opts()).unwrap();
    let second = engine.save("use rustfmt please", &[1.0, 0.0001, 0.0], opts()).unwrap();
    assert!(second.duplicate);
    assert_eq!(second.id, first.id);
}

#[test]
fn delete_removes_the_memory() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let outcome = engine.save("temp note", &[0.5, 0.5], opts()).unwrap();
    engine.delete(outcome.id).unwrap();
    assert!(engine.get_by_id(outcome.id).unwrap().is_none());
}

#[test]
fn update_tags_replaces_the_tag_set() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let outcome = engine.save("content", &[0.2, 0.8], opts()).unwrap();
    engine.update_tags(outcome.id, vec!["a".to_string(), "b".to_string()]).unwrap();
    let memory = engine.get_by_id(outcome.id).unwrap().unwrap();
    assert_eq!(memory.tags, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn increment_correction_count_pins_after_two() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let a = engine.save("wrong fact", &[0.1, 0.1], opts()).unwrap();
    let b = engine.save("correction", &[0.9, 0.9], opts()).unwrap();

    engine.increment_correction_count(a.id, b.id).unwrap();
    assert!(!engine.get_by_id(a.id).unwrap().unwrap().is_pinned());

    engine.increment_correction_count(a.id, b.id).unwrap();
    let memory = engine.get_by_id(a.id).unwrap().unwrap();
    assert!(memory.is_pinned());
    assert_eq!(memory.invalidated_by, Some(b.id));
}

#[test]
fn save_batch_skips_duplicates_within_and_against_existing() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.save("existing", &[1.0, 0.0], opts()).unwrap();

    let items = vec![
        BatchItem { content: "dup of existing".to_string(), embedding: vec![1.0, 0.0001], opts: opts() },
        BatchItem { content: "fresh one".to_string(), embedding: vec![0.0, 1.0], opts: opts() },
        BatchItem { content: "dup within batch".to_string(), embedding: vec![0.0, 0.9999], opts: opts() },
    ];
    let result = engine.save_batch(&items, 0.9).unwrap();
    assert_eq!(result.saved.len(), 1);
    assert_eq!(result.skipped.len(), 2);
}

#[test]
fn all_valid_excludes_invalidated_and_not_yet_valid_memories() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let live = engine.save("still true", &[0.3, 0.3], opts()).unwrap();
    let dead = engine.save("was true", &[0.7, 0.7], opts()).unwrap();
    engine.increment_correction_count(dead.id, live.id).unwrap();

    let valid = engine.all_valid(Utc::now()).unwrap();
    let ids: Vec<_> = valid.iter().map(|m| m.id).collect();
    assert!(ids.contains(&live.id));
    assert!(!ids.contains(&dead.id));
}

#[test]
fn chunk_round_trip_and_delete_by_path() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let chunk = succ_core::models::Chunk {
        id: 0,
        file_path: "src/main.rs".to_string(),
        chunk_index: 0,
        content: "fn main() {}".to_string(),
        start_line: 1,
        end_line: 1,
        embedding: vec![0.1, 0.2],
        symbol_name: Some("main".to_string()),
        symbol_type: Some("function".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    engine
        .upsert_chunks(ChunkCorpus::Code, "src/main.rs", "hash123", vec![chunk])
        .unwrap();

    let chunks = engine.chunks_for_path(ChunkCorpus::Code, "src/main.rs").unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].symbol_name.as_deref(), Some("main"));

    engine.delete_by_path(ChunkCorpus::Code, "src/main.rs").unwrap();
    assert!(engine.chunks_for_path(ChunkCorpus::Code, "src/main.rs").unwrap().is_empty());
}

#[test]
fn links_are_undirected_by_pair_key() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let a = engine.save("memory a", &[0.1, 0.1], opts()).unwrap();
    let b = engine.save("memory b", &[0.9, 0.1], opts()).unwrap();

    let link = succ_core::models::MemoryLink {
        id: 0,
        source_id: b.id,
        target_id: a.id,
        relation: succ_core::models::RelationType::Related,
        weight: 0.5,
        llm_enriched: false,
        created_at: Utc::now(),
    };
    let created = engine.create_link(link).unwrap();
    assert!(created.source_id <= created.target_id);
    assert!(engine.link_exists(a.id, b.id).unwrap());
    assert!(engine.link_exists(b.id, a.id).unwrap());
}

#[test]
fn session_stats_track_creates_and_deletes() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let outcome = engine.save("tracked", &[0.4, 0.6], opts()).unwrap();
    engine.delete(outcome.id).unwrap();

    let stats = engine.session_stats();
    assert_eq!(stats.memories_created, 1);
    assert_eq!(stats.memories_deleted, 1);
}
