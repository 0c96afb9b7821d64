use succ_core::memory::MemoryType;
use succ_core::traits::{MemoryStore, SaveOptions};
use succ_storage::StorageEngine;

#[test]
fn memories_survive_reopening_the_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("succ.db");

    let id = {
        let engine = StorageEngine::open(&path).unwrap();
        let outcome = engine
            .save(
                "persisted across restarts",
                &[0.1, 0.2, 0.3],
                SaveOptions { memory_type: MemoryType::Decision, quality_score: 0.7, ..Default::default() },
            )
            .unwrap();
        outcome.id
    };

    let engine = StorageEngine::open(&path).unwrap();
    let memory = engine.get_by_id(id).unwrap().expect("memory should persist");
    assert_eq!(memory.content, "persisted across restarts");
    assert_eq!(memory.memory_type, MemoryType::Decision);
}
