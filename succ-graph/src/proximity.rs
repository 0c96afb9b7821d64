//! Proximity linking (spec.md §4.7): an offline pass that links
//! memories whose `source` fields share a parent directory often
//! enough to suggest they're about the same area of the codebase.

use std::collections::HashMap;

use succ_core::memory::{Memory, MemoryId};

/// Collapse a source path to its parent directory. Non-path sources
/// (session ids, caller tags) collapse to themselves.
pub fn normalize_source(source: &str) -> String {
    match source.rsplit_once('/') {
        Some((parent, _file)) if !parent.is_empty() => parent.to_string(),
        _ => source.to_string(),
    }
}

/// A `related`-edge candidate with its normalized cooccurrence weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityCandidate {
    pub a: MemoryId,
    pub b: MemoryId,
    pub cooccurrence: u32,
    pub weight: f64,
}

/// Group `memories` by normalized source; for every unordered pair
/// within a group, tally a cooccurrence count. Pairs at or above
/// `min_cooccurrence` are returned with `weight = count / max_count`.
pub fn proximity_candidates(memories: &[Memory], min_cooccurrence: u32) -> Vec<ProximityCandidate> {
    let mut groups: HashMap<String, Vec<MemoryId>> = HashMap::new();
    for memory in memories {
        groups.entry(normalize_source(&memory.source)).or_default().push(memory.id);
    }

    let mut counts: HashMap<(MemoryId, MemoryId), u32> = HashMap::new();
    for ids in groups.values() {
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let key = pair_key(ids[i], ids[j]);
                *counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    let max_count = counts.values().copied().max().unwrap_or(1).max(1);

    let mut candidates: Vec<ProximityCandidate> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_cooccurrence)
        .map(|((a, b), count)| ProximityCandidate {
            a,
            b,
            cooccurrence: count,
            weight: count as f64 / max_count as f64,
        })
        .collect();

    candidates.sort_by(|a, b| a.a.cmp(&b.a).then(a.b.cmp(&b.b)));
    candidates
}

fn pair_key(a: MemoryId, b: MemoryId) -> (MemoryId, MemoryId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use succ_core::memory::{Memory, MemoryType, QualityFactors};

    fn memory(id: MemoryId, source: &str) -> Memory {
        Memory {
            id,
            content: "content".to_string(),
            embedding: vec![],
            tags: vec![],
            source: source.to_string(),
            memory_type: MemoryType::Observation,
            quality_score: 0.5,
            quality_factors: QualityFactors::new(),
            access_count: 0,
            last_accessed: Utc::now(),
            created_at: Utc::now(),
            valid_from: None,
            valid_until: None,
            is_invariant: false,
            correction_count: 0,
            invalidated_by: None,
        }
    }

    #[test]
    fn collapses_file_paths_to_parent_directory() {
        assert_eq!(normalize_source("src/auth/login.rs"), "src/auth");
        assert_eq!(normalize_source("session-42"), "session-42");
    }

    #[test]
    fn pairs_below_min_cooccurrence_are_dropped() {
        let memories = vec![memory(1, "src/auth/login.rs"), memory(2, "src/auth/logout.rs")];
        assert!(proximity_candidates(&memories, 2).is_empty());
    }

    #[test]
    fn repeated_group_membership_accumulates_cooccurrence() {
        let memories = vec![
            memory(1, "src/auth/login.rs"),
            memory(2, "src/auth/logout.rs"),
            memory(3, "src/auth/session.rs"),
        ];
        // all three share "src/auth" once; with a second group repeating
        // the (1,2) pair, it should cross the threshold while (1,3)/(2,3) don't.
        let mut memories2 = memories.clone();
        memories2.extend(vec![memory(1, "src/auth/login.rs"), memory(2, "src/auth/logout.rs")]);
        let candidates = proximity_candidates(&memories2, 2);
        assert!(candidates.iter().any(|c| c.a == 1 && c.b == 2));
    }
}
