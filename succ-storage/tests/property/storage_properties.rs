use proptest::prelude::*;

use succ_core::memory::MemoryType;
use succ_core::traits::{MemoryStore, SaveOptions};
use succ_storage::StorageEngine;

fn opts() -> SaveOptions {
    SaveOptions {
        memory_type: MemoryType::Observation,
        quality_score: 0.5,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn saved_content_always_round_trips(content in ".{1,200}", a in -1.0f32..1.0, b in -1.0f32..1.0) {
        let engine = StorageEngine::open_in_memory().unwrap();
        let outcome = engine.save(&content, &[a, b], opts()).unwrap();
        let memory = engine.get_by_id(outcome.id).unwrap();
        prop_assert!(memory.is_some());
        prop_assert_eq!(memory.unwrap().content, content);
    }

    #[test]
    fn access_count_only_ever_increases(n in 1usize..10) {
        let engine = StorageEngine::open_in_memory().unwrap();
        let outcome = engine.save("tracked memory", &[0.2, 0.3], opts()).unwrap();
        for _ in 0..n {
            engine.increment_access_batch(&[outcome.id]).unwrap();
        }
        let memory = engine.get_by_id(outcome.id).unwrap().unwrap();
        prop_assert_eq!(memory.access_count, n as u64);
    }
}
