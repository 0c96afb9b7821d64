//! Auto-link (spec.md §4.7): after a memory is saved, link it to
//! similar existing memories so the graph stays populated without a
//! separate offline pass.

use chrono::Utc;

use succ_core::errors::SuccResult;
use succ_core::memory::MemoryId;
use succ_core::models::{MemoryLink, RelationType};
use succ_core::traits::MemoryStore;

/// Create `similar_to` edges from `new_id` to its top vector-search
/// matches, skipping any pair that already shares an edge.
pub fn auto_link(
    store: &dyn MemoryStore,
    new_id: MemoryId,
    embedding: &[f32],
    threshold: f64,
    limit: usize,
) -> SuccResult<Vec<MemoryLink>> {
    let candidates = store.search_by_vector(embedding, limit, threshold)?;

    let mut created = Vec::new();
    for (candidate_id, similarity) in candidates {
        if candidate_id == new_id {
            continue;
        }
        if store.link_exists(new_id, candidate_id)? {
            continue;
        }
        let link = store.create_link(MemoryLink {
            id: 0,
            source_id: new_id,
            target_id: candidate_id,
            relation: RelationType::SimilarTo,
            weight: similarity,
            llm_enriched: false,
            created_at: Utc::now(),
        })?;
        created.push(link);
    }
    Ok(created)
}
