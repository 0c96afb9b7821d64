//! `priority_score` (spec.md §4.6): ranks non-pinned memories for the
//! remaining working-set slots once all pinned candidates are seated.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use succ_core::memory::Memory;

const IS_INVARIANT_WEIGHT: f64 = 0.30;
const CONFIDENCE_WEIGHT: f64 = 0.25;
const CORRECTION_WEIGHT: f64 = 0.20;
const TYPE_WEIGHT: f64 = 0.15;
const ACCESS_WEIGHT: f64 = 0.10;

const CORRECTION_CAP: f64 = 5.0;
const ACCESS_CAP: f64 = 20.0;
const HALF_LIFE_HOURS: f64 = 168.0;
const MIN_DECAY: f64 = 0.1;
const IMPORTANT_TAG_BOOST: f64 = 0.1;

static IMPORTANT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)critical|architecture|security").expect("static regex"));

/// `type_weight` with the +0.1 important-tag boost, capped at 1.0.
pub fn type_weight(memory: &Memory) -> f64 {
    let base = memory.memory_type.priority_weight();
    if memory.tags.iter().any(|t| IMPORTANT_TAG.is_match(t)) {
        (base + IMPORTANT_TAG_BOOST).min(1.0)
    } else {
        base
    }
}

/// `quality_score · max(exp(-ln2·Δh/168), 0.1)`, Δh = hours since
/// `last_accessed`.
pub fn confidence_decayed(memory: &Memory, now: DateTime<Utc>) -> f64 {
    let delta_hours = (now - memory.last_accessed).num_seconds() as f64 / 3600.0;
    let decay = (-std::f64::consts::LN_2 * delta_hours.max(0.0) / HALF_LIFE_HOURS).exp().max(MIN_DECAY);
    memory.quality_score * decay
}

pub fn priority_score(memory: &Memory, now: DateTime<Utc>) -> f64 {
    let is_invariant = if memory.is_invariant { 1.0 } else { 0.0 };
    let correction_term = (memory.correction_count as f64).min(CORRECTION_CAP) / CORRECTION_CAP;
    let access_term = (memory.access_count as f64).min(ACCESS_CAP) / ACCESS_CAP;

    IS_INVARIANT_WEIGHT * is_invariant
        + CONFIDENCE_WEIGHT * confidence_decayed(memory, now)
        + CORRECTION_WEIGHT * correction_term
        + TYPE_WEIGHT * type_weight(memory)
        + ACCESS_WEIGHT * access_term
}

#[cfg(test)]
mod tests {
    use super::*;
    use succ_core::memory::{MemoryType, QualityFactors};

    fn memory(memory_type: MemoryType, tags: Vec<&str>) -> Memory {
        Memory {
            id: 1,
            content: "x".to_string(),
            embedding: vec![],
            tags: tags.into_iter().map(String::from).collect(),
            source: "test".to_string(),
            memory_type,
            quality_score: 0.8,
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
    fn important_tag_boosts_type_weight() {
        let plain = memory(MemoryType::Observation, vec![]);
        let tagged = memory(MemoryType::Observation, vec!["security"]);
        assert!(type_weight(&tagged) > type_weight(&plain));
    }

    #[test]
    fn boost_does_not_exceed_cap() {
        let m = memory(MemoryType::Decision, vec!["critical"]);
        assert!((type_weight(&m) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stale_memory_decays_below_fresh_one() {
        let mut stale = memory(MemoryType::Observation, vec![]);
        stale.last_accessed = Utc::now() - chrono::Duration::hours(336);
        let fresh = memory(MemoryType::Observation, vec![]);
        let now = Utc::now();
        assert!(confidence_decayed(&stale, now) < confidence_decayed(&fresh, now));
    }

    #[test]
    fn invariant_memory_scores_higher_than_non_invariant() {
        let mut invariant = memory(MemoryType::Observation, vec![]);
        invariant.is_invariant = true;
        let plain = memory(MemoryType::Observation, vec![]);
        let now = Utc::now();
        assert!(priority_score(&invariant, now) > priority_score(&plain, now));
    }
}
