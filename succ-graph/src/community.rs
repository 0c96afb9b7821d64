//! Deterministic community detection (spec.md §4.7): a fixed-order,
//! weighted label-propagation pass over the link graph. Ties always
//! break toward the lowest memory id so repeated runs on the same
//! graph produce the same partition.

use std::collections::HashMap;

use petgraph::graphmap::UnGraphMap;

use succ_core::memory::MemoryId;
use succ_core::models::MemoryLink;

const MAX_ITERATIONS: usize = 20;

/// Partition the link graph into communities. Isolated memories (no
/// edges) are not included — they can't form a reflection cluster.
pub fn detect(links: &[MemoryLink]) -> Vec<Vec<MemoryId>> {
    let mut graph: UnGraphMap<MemoryId, f64> = UnGraphMap::new();
    for link in links {
        let weight = graph
            .edge_weight(link.source_id, link.target_id)
            .copied()
            .unwrap_or(0.0)
            + link.weight;
        graph.add_edge(link.source_id, link.target_id, weight);
    }

    let mut nodes: Vec<MemoryId> = graph.nodes().collect();
    nodes.sort_unstable();
    if nodes.is_empty() {
        return Vec::new();
    }

    let mut labels: HashMap<MemoryId, MemoryId> = nodes.iter().map(|&n| (n, n)).collect();

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for &node in &nodes {
            let mut weight_by_label: HashMap<MemoryId, f64> = HashMap::new();
            for neighbor in graph.neighbors(node) {
                let edge_weight = graph.edge_weight(node, neighbor).copied().unwrap_or(0.0);
                *weight_by_label.entry(labels[&neighbor]).or_insert(0.0) += edge_weight;
            }
            if weight_by_label.is_empty() {
                continue;
            }

            let best_weight = weight_by_label.values().cloned().fold(f64::MIN, f64::max);
            let mut best_label = labels[&node];
            for (&label, &weight) in &weight_by_label {
                if weight > best_weight - f64::EPSILON && label < best_label {
                    best_label = label;
                }
            }

            if labels[&node] != best_label {
                labels.insert(node, best_label);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut clusters: HashMap<MemoryId, Vec<MemoryId>> = HashMap::new();
    for &node in &nodes {
        clusters.entry(labels[&node]).or_default().push(node);
    }

    let mut result: Vec<Vec<MemoryId>> = clusters.into_values().collect();
    for cluster in &mut result {
        cluster.sort_unstable();
    }
    result.sort_by_key(|c| c[0]);
    result
}

/// Clusters at or above the reflection-synthesis size floor
/// (spec.md §4.7, `MIN_COMMUNITY_SIZE_FOR_REFLECTION`).
pub fn filter_min_size(clusters: Vec<Vec<MemoryId>>, min_size: usize) -> Vec<Vec<MemoryId>> {
    clusters.into_iter().filter(|c| c.len() >= min_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use succ_core::models::RelationType;

    fn link(source: u64, target: u64, weight: f64) -> MemoryLink {
        MemoryLink {
            id: 0,
            source_id: source,
            target_id: target,
            relation: RelationType::Related,
            weight,
            llm_enriched: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn two_disjoint_triangles_form_two_communities() {
        let links = vec![
            link(1, 2, 0.9),
            link(2, 3, 0.9),
            link(1, 3, 0.9),
            link(10, 11, 0.9),
            link(11, 12, 0.9),
            link(10, 12, 0.9),
        ];
        let clusters = detect(&links);
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().any(|c| c == &vec![1, 2, 3]));
        assert!(clusters.iter().any(|c| c == &vec![10, 11, 12]));
    }

    #[test]
    fn detection_is_deterministic_across_runs() {
        let links = vec![link(1, 2, 0.5), link(2, 3, 0.5), link(3, 4, 0.5)];
        assert_eq!(detect(&links), detect(&links));
    }

    #[test]
    fn min_size_filter_drops_small_clusters() {
        let clusters = vec![vec![1, 2], vec![3, 4, 5, 6, 7]];
        assert_eq!(filter_min_size(clusters, 5), vec![vec![3, 4, 5, 6, 7]]);
    }
}
