//! Delete/invalidate guard (spec.md §8 testable property 2): pinned
//! memories can never be removed, regardless of caller.

use succ_core::errors::{SuccError, SuccResult};
use succ_core::memory::MemoryId;
use succ_core::traits::storage::MemoryStore;

pub fn forget(store: &dyn MemoryStore, id: MemoryId) -> SuccResult<()> {
    let memory = store
        .get_by_id(id)?
        .ok_or_else(|| SuccError::NotFound(format!("memory {id}")))?;
    if memory.is_pinned() {
        return Err(SuccError::PinnedMemory { id: id.to_string() });
    }
    store.delete(id)
}
