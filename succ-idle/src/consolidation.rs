//! Consolidation (spec.md §4.8 job 1): synchronous, no LLM. Pairs
//! memories above `similarity_for_merge`, decides delete_duplicate /
//! merge / keep_both, and transfers links off the deleted side before
//! removing it.

use succ_core::constants::DEFAULT_AUTO_LINK_THRESHOLD;
use succ_core::errors::SuccResult;
use succ_core::memory::{Memory, MemoryId};
use succ_core::models::link::RelationType;
use succ_core::traits::embedding::cosine_similarity;
use succ_core::traits::storage::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    DeleteDuplicate,
    Merge,
    KeepBoth,
}

#[derive(Debug, Clone, Default)]
pub struct ConsolidationReport {
    pub pairs_considered: usize,
    pub deleted: Vec<MemoryId>,
    pub merged: Vec<(MemoryId, MemoryId)>,
    pub linked: Vec<(MemoryId, MemoryId)>,
}

/// One pair's worth of unique-info heuristic: a merge candidate is
/// "unique" on each side if its content adds length beyond what's
/// already implied by the other's content. A crude but cheap proxy
/// for "both have unique info" (spec.md §4.8 job 1) absent an LLM.
fn has_unique_info(a: &Memory, b: &Memory) -> bool {
    let shorter = a.content.len().min(b.content.len()) as f64;
    let longer = a.content.len().max(b.content.len()) as f64;
    if longer == 0.0 {
        return false;
    }
    shorter / longer < 0.7
}

fn decide(a: &Memory, b: &Memory) -> (Decision, MemoryId, MemoryId) {
    if a.is_pinned() && b.is_pinned() {
        return (Decision::KeepBoth, a.id, b.id);
    }

    // Pinned side always wins `keep`, for both the merge and the
    // delete-duplicate branches below — a pinned memory never becomes
    // `drop` (spec.md §4.8: "pinned memories never participate as the
    // deleted side").
    let (keep, drop) = if a.is_pinned() {
        (a, b)
    } else if b.is_pinned() {
        (b, a)
    } else if (a.quality_score - b.quality_score).abs() > 0.05 {
        if a.quality_score > b.quality_score { (a, b) } else { (b, a) }
    } else if a.created_at >= b.created_at {
        (a, b)
    } else {
        (b, a)
    };

    if has_unique_info(a, b) {
        return (Decision::Merge, keep.id, drop.id);
    }

    (Decision::DeleteDuplicate, keep.id, drop.id)
}

/// Moves every link touching `from` onto `to`, skipping links that
/// would duplicate an existing `to` edge.
fn transfer_links(store: &dyn MemoryStore, from: MemoryId, to: MemoryId) -> SuccResult<()> {
    let (outgoing, incoming) = store.links_for(from)?;
    for link in outgoing {
        if link.target_id == to || store.link_exists(to, link.target_id)? {
            store.delete_link(link.id)?;
            continue;
        }
        store.create_link(succ_core::models::link::MemoryLink {
            id: 0,
            source_id: to,
            target_id: link.target_id,
            relation: link.relation,
            weight: link.weight,
            llm_enriched: link.llm_enriched,
            created_at: link.created_at,
        })?;
        store.delete_link(link.id)?;
    }
    for link in incoming {
        if link.source_id == to || store.link_exists(link.source_id, to)? {
            store.delete_link(link.id)?;
            continue;
        }
        store.create_link(succ_core::models::link::MemoryLink {
            id: 0,
            source_id: link.source_id,
            target_id: to,
            relation: link.relation,
            weight: link.weight,
            llm_enriched: link.llm_enriched,
            created_at: link.created_at,
        })?;
        store.delete_link(link.id)?;
    }
    Ok(())
}

/// Runs one consolidation pass over up to `max_memories_to_process`
/// candidates. Pairing is greedy and order-stable: once a memory is
/// consumed by a decision it is not reconsidered this pass.
pub fn consolidate(
    store: &dyn MemoryStore,
    candidates: &[Memory],
    similarity_for_merge: f64,
    max_memories_to_process: usize,
) -> SuccResult<ConsolidationReport> {
    let mut report = ConsolidationReport::default();
    let pool = &candidates[..candidates.len().min(max_memories_to_process)];
    let mut consumed = vec![false; pool.len()];

    for i in 0..pool.len() {
        if consumed[i] {
            continue;
        }
        for j in (i + 1)..pool.len() {
            if consumed[j] {
                continue;
            }
            let similarity = cosine_similarity(&pool[i].embedding, &pool[j].embedding);
            if similarity < similarity_for_merge {
                continue;
            }
            report.pairs_considered += 1;

            let (decision, keep_id, drop_id) = decide(&pool[i], &pool[j]);
            match decision {
                Decision::DeleteDuplicate => {
                    transfer_links(store, drop_id, keep_id)?;
                    store.delete(drop_id)?;
                    report.deleted.push(drop_id);
                }
                Decision::Merge => {
                    transfer_links(store, drop_id, keep_id)?;
                    store.delete(drop_id)?;
                    report.merged.push((keep_id, drop_id));
                }
                Decision::KeepBoth => {
                    if !store.link_exists(keep_id, drop_id)? {
                        store.create_link(succ_core::models::link::MemoryLink {
                            id: 0,
                            source_id: keep_id,
                            target_id: drop_id,
                            relation: RelationType::SimilarTo,
                            weight: similarity.max(DEFAULT_AUTO_LINK_THRESHOLD),
                            llm_enriched: false,
                            created_at: chrono::Utc::now(),
                        })?;
                        report.linked.push((keep_id, drop_id));
                    }
                }
            }

            consumed[j] = true;
            if decision != Decision::KeepBoth {
                consumed[i] = true;
                break;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use succ_core::memory::QualityFactors;
    use succ_core::memory::MemoryType;
    use chrono::Utc;

    fn memory(id: MemoryId, content: &str, quality: f64, pinned: bool) -> Memory {
        Memory {
            id,
            content: content.to_string(),
            embedding: vec![1.0, 0.0],
            tags: vec![],
            source: "test".to_string(),
            memory_type: MemoryType::Observation,
            quality_score: quality,
            quality_factors: QualityFactors::new(),
            access_count: 0,
            last_accessed: Utc::now(),
            created_at: Utc::now(),
            valid_from: None,
            valid_until: None,
            is_invariant: pinned,
            correction_count: 0,
            invalidated_by: None,
        }
    }

    #[test]
    fn pinned_pair_is_kept_both() {
        let a = memory(1, "same text here", 0.5, true);
        let b = memory(2, "same text here", 0.5, true);
        let (decision, _, _) = decide(&a, &b);
        assert_eq!(decision, Decision::KeepBoth);
    }

    #[test]
    fn dissimilar_lengths_look_unique_and_merge() {
        let a = memory(1, "short", 0.5, false);
        let b = memory(2, "a substantially longer piece of unique content here", 0.5, false);
        let (decision, ..) = decide(&a, &b);
        assert_eq!(decision, Decision::Merge);
    }

    #[test]
    fn near_identical_non_pinned_deletes_the_weaker() {
        let a = memory(1, "identical content string", 0.9, false);
        let b = memory(2, "identical content strink", 0.4, false);
        let (decision, keep, drop) = decide(&a, &b);
        assert_eq!(decision, Decision::DeleteDuplicate);
        assert_eq!(keep, 1);
        assert_eq!(drop, 2);
    }

    #[test]
    fn pinned_side_is_kept_even_if_lower_quality() {
        let a = memory(1, "identical content string", 0.9, false);
        let b = memory(2, "identical content strink", 0.4, true);
        let (decision, keep, drop) = decide(&a, &b);
        assert_eq!(decision, Decision::DeleteDuplicate);
        assert_eq!(keep, 2);
        assert_eq!(drop, 1);
    }

    #[test]
    fn pinned_side_is_kept_even_when_merge_looks_unique() {
        let a = memory(1, "short", 0.5, false);
        let b = memory(2, "a substantially longer piece of unique content here", 0.5, true);
        let (decision, keep, drop) = decide(&a, &b);
        assert_eq!(decision, Decision::Merge);
        assert_eq!(keep, 2, "pinned memory must never be the dropped side of a merge");
        assert_eq!(drop, 1);
    }
}
