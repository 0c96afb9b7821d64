//! Correction protocol (spec.md §4.6): a new memory that supersedes an
//! older one invalidates the old memory and records the new memory as
//! the source of a correction. Pinned memories cannot be corrected.

use chrono::Utc;

use succ_core::errors::{SuccError, SuccResult};
use succ_core::memory::MemoryId;
use succ_core::models::link::{MemoryLink, RelationType};
use succ_core::traits::storage::MemoryStore;

/// Records that `new_id` supersedes `old_id`: links them, invalidates
/// `old_id`, and bumps `new_id`'s correction count. Fails with
/// `PinnedMemory` if `old_id` is pinned (spec.md §3 invariants).
pub fn correct(store: &dyn MemoryStore, new_id: MemoryId, old_id: MemoryId) -> SuccResult<MemoryLink> {
    let old_memory = store
        .get_by_id(old_id)?
        .ok_or_else(|| SuccError::NotFound(format!("memory {old_id}")))?;

    if old_memory.is_pinned() {
        return Err(SuccError::PinnedMemory { id: old_id.to_string() });
    }

    let link = store.create_link(MemoryLink {
        id: 0,
        source_id: new_id,
        target_id: old_id,
        relation: RelationType::Supersedes,
        weight: 1.0,
        llm_enriched: false,
        created_at: Utc::now(),
    })?;

    store.increment_correction_count(new_id, old_id)?;

    Ok(link)
}
