//! Working-memory pipeline (spec.md §4.6): the bounded slate of
//! memories presented at the start of a session.
//!
//! 1. Filter by temporal validity at `now`.
//! 2. Collect pinned memories first, truncating if they alone fill the
//!    limit.
//! 3. Rank the remaining candidates by `priority_score`.
//! 4. Apply a diversity filter: skip any candidate whose embedding is
//!    ≥0.85 cosine-similar to an already-selected memory.

use chrono::{DateTime, Utc};

use succ_core::constants::DEFAULT_DIVERSITY_THRESHOLD;
use succ_core::memory::Memory;
use succ_core::traits::embedding::cosine_similarity;

use crate::priority::priority_score;

pub fn build_working_set(candidates: &[Memory], limit: usize, now: DateTime<Utc>) -> Vec<Memory> {
    let valid: Vec<&Memory> = candidates.iter().filter(|m| m.is_valid_at(now)).collect();

    let mut selected: Vec<Memory> = Vec::with_capacity(limit);

    let mut pinned: Vec<&Memory> = valid.iter().copied().filter(|m| m.is_pinned()).collect();
    pinned.sort_by_key(|m| m.id);
    for memory in pinned {
        if selected.len() >= limit {
            break;
        }
        selected.push(memory.clone());
    }
    if selected.len() >= limit {
        return selected;
    }

    let mut remaining: Vec<&Memory> = valid.iter().copied().filter(|m| !m.is_pinned()).collect();
    remaining.sort_by(|a, b| {
        priority_score(b, now)
            .partial_cmp(&priority_score(a, now))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    for candidate in remaining {
        if selected.len() >= limit {
            break;
        }
        let is_duplicate = selected
            .iter()
            .any(|s| cosine_similarity(&s.embedding, &candidate.embedding) >= DEFAULT_DIVERSITY_THRESHOLD);
        if is_duplicate {
            continue;
        }
        selected.push(candidate.clone());
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use succ_core::memory::{MemoryType, QualityFactors};

    fn memory(id: u64, embedding: Vec<f32>, pinned: bool) -> Memory {
        Memory {
            id,
            content: "x".to_string(),
            embedding,
            tags: vec![],
            source: "test".to_string(),
            memory_type: if pinned { MemoryType::Decision } else { MemoryType::Observation },
            quality_score: 0.8,
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
    fn pinned_memories_fill_before_ranking() {
        let candidates = vec![
            memory(1, vec![1.0, 0.0], true),
            memory(2, vec![0.0, 1.0], false),
        ];
        let working_set = build_working_set(&candidates, 1, Utc::now());
        assert_eq!(working_set.len(), 1);
        assert_eq!(working_set[0].id, 1);
    }

    #[test]
    fn diversity_filter_skips_near_duplicate() {
        let candidates = vec![
            memory(1, vec![1.0, 0.0], false),
            memory(2, vec![0.99, 0.01], false),
            memory(3, vec![0.0, 1.0], false),
        ];
        let working_set = build_working_set(&candidates, 2, Utc::now());
        let ids: Vec<u64> = working_set.iter().map(|m| m.id).collect();
        assert!(!(ids.contains(&1) && ids.contains(&2)));
    }

    #[test]
    fn expired_memories_are_excluded() {
        let mut expired = memory(1, vec![1.0, 0.0], false);
        expired.valid_until = Some(Utc::now() - chrono::Duration::hours(1));
        let candidates = vec![expired];
        let working_set = build_working_set(&candidates, 5, Utc::now());
        assert!(working_set.is_empty());
    }
}
