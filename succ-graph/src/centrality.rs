//! Degree centrality (spec.md §4.7): `#outgoing + #incoming`, normalized
//! by the maximum degree in the graph. Feeds the retriever's
//! centrality boost (spec.md §4.5 step 6).

use std::collections::HashMap;

use succ_core::memory::MemoryId;
use succ_core::models::{CentralityScore, MemoryLink};

pub fn compute(links: &[MemoryLink]) -> Vec<CentralityScore> {
    let mut degree: HashMap<MemoryId, u32> = HashMap::new();
    for link in links {
        *degree.entry(link.source_id).or_insert(0) += 1;
        *degree.entry(link.target_id).or_insert(0) += 1;
    }

    let max_degree = degree.values().copied().max().unwrap_or(0).max(1);

    let mut scores: Vec<CentralityScore> = degree
        .into_iter()
        .map(|(memory_id, degree)| CentralityScore {
            memory_id,
            degree,
            normalized_degree: degree as f64 / max_degree as f64,
        })
        .collect();
    scores.sort_by_key(|s| s.memory_id);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use succ_core::models::RelationType;

    fn link(source: u64, target: u64) -> MemoryLink {
        MemoryLink {
            id: 0,
            source_id: source,
            target_id: target,
            relation: RelationType::Related,
            weight: 1.0,
            llm_enriched: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn most_connected_node_normalizes_to_one() {
        let links = vec![link(1, 2), link(1, 3), link(1, 4)];
        let scores = compute(&links);
        let hub = scores.iter().find(|s| s.memory_id == 1).unwrap();
        assert_eq!(hub.degree, 3);
        assert!((hub.normalized_degree - 1.0).abs() < 1e-9);
    }

    #[test]
    fn leaf_nodes_have_lower_normalized_degree() {
        let links = vec![link(1, 2), link(1, 3), link(1, 4)];
        let scores = compute(&links);
        let leaf = scores.iter().find(|s| s.memory_id == 2).unwrap();
        assert!(leaf.normalized_degree < 1.0);
    }

    #[test]
    fn empty_graph_has_no_scores() {
        assert!(compute(&[]).is_empty());
    }
}
