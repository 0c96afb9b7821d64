//! Reciprocal-rank fusion: `score = Σ 1/(k + rank)` across any number of
//! pre-ranked lists. A candidate absent from a list simply never
//! receives that list's term, equivalent to treating its rank in that
//! list as infinite (spec.md §4.5 step 5).

use std::collections::HashMap;
use std::hash::Hash;

/// Fuse pre-ranked lists (best match first) into one score-descending
/// ranking.
pub fn fuse<Id: Clone + Eq + Hash>(lists: &[&[Id]], k: u32) -> Vec<(Id, f64)> {
    let mut scores: HashMap<Id, f64> = HashMap::new();
    for list in lists {
        for (idx, id) in list.iter().enumerate() {
            let rank = idx + 1;
            *scores.entry(id.clone()).or_insert(0.0) += 1.0 / (k as f64 + rank as f64);
        }
    }

    let mut fused: Vec<(Id, f64)> = scores.into_iter().collect();
    fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_in_both_lists_outranks_single_list_candidate() {
        let bm25 = vec!["a".to_string(), "b".to_string()];
        let vector = vec!["b".to_string(), "c".to_string()];
        let fused = fuse(&[&bm25, &vector], 60);
        assert_eq!(fused[0].0, "b");
    }

    #[test]
    fn missing_list_contributes_nothing() {
        let bm25 = vec!["a".to_string()];
        let fused = fuse(&[&bm25, &[]], 60);
        assert_eq!(fused[0].0, "a");
        assert!((fused[0].1 - 1.0 / 61.0).abs() < 1e-9);
    }

    #[test]
    fn empty_lists_fuse_to_empty() {
        let empty: Vec<String> = vec![];
        let fused: Vec<(String, f64)> = fuse(&[&empty], 60);
        assert!(fused.is_empty());
    }
}
