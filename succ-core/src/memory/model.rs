use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quality::QualityFactors;
use super::ty::MemoryType;
use crate::constants::PINNED_CORRECTION_COUNT;

/// A stable 64-bit memory identifier. Never reused within a namespace
/// after deletion (spec.md §3 invariants).
pub type MemoryId = u64;

/// The universal memory record (spec.md §3). Every memory in the system
/// — project-namespaced or global — is a `Memory`.
#[derive(Debug, Clone, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Memory {
    pub id: MemoryId,
    pub content: String,
    pub embedding: Vec<f32>,
    /// Ordered, duplicate-free set of tags.
    pub tags: Vec<String>,
    /// Free string: file path, session id, or caller tag.
    pub source: String,
    pub memory_type: MemoryType,
    pub quality_score: f64,
    pub quality_factors: QualityFactors,
    pub access_count: u64,
    pub last_accessed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_invariant: bool,
    pub correction_count: u32,
    pub invalidated_by: Option<MemoryId>,
}

impl Memory {
    /// A memory is pinned (Tier 1) iff it is marked invariant or has
    /// accumulated at least `PINNED_CORRECTION_COUNT` corrections.
    /// Pinned memories cannot be deleted or invalidated (spec.md §3).
    pub fn is_pinned(&self) -> bool {
        self.is_invariant || self.correction_count >= PINNED_CORRECTION_COUNT
    }

    /// A memory is valid at time `t` iff `valid_from <= t` (or unset),
    /// `valid_until > t` (or unset), and it has not been invalidated.
    pub fn is_valid_at(&self, t: DateTime<Utc>) -> bool {
        if self.invalidated_by.is_some() {
            return false;
        }
        if let Some(from) = self.valid_from {
            if from > t {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if until <= t {
                return false;
            }
        }
        true
    }

    /// Push a tag, keeping the ordered-set invariant (no duplicates).
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.iter().any(|t| t == &tag) {
            self.tags.push(tag);
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_memory() -> Memory {
        Memory {
            id: 1,
            content: "example".to_string(),
            embedding: vec![0.1, 0.2],
            tags: vec![],
            source: "test".to_string(),
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
    fn not_pinned_by_default() {
        assert!(!base_memory().is_pinned());
    }

    #[test]
    fn pinned_when_invariant() {
        let mut m = base_memory();
        m.is_invariant = true;
        assert!(m.is_pinned());
    }

    #[test]
    fn pinned_after_two_corrections() {
        let mut m = base_memory();
        m.correction_count = 2;
        assert!(m.is_pinned());
    }

    #[test]
    fn invalid_once_superseded() {
        let mut m = base_memory();
        m.invalidated_by = Some(42);
        assert!(!m.is_valid_at(Utc::now()));
    }

    #[test]
    fn invalid_before_valid_from() {
        let mut m = base_memory();
        m.valid_from = Some(Utc::now() + Duration::days(1));
        assert!(!m.is_valid_at(Utc::now()));
    }

    #[test]
    fn invalid_after_valid_until() {
        let mut m = base_memory();
        m.valid_until = Some(Utc::now() - Duration::days(1));
        assert!(!m.is_valid_at(Utc::now()));
    }

    #[test]
    fn tags_stay_deduplicated() {
        let mut m = base_memory();
        m.push_tag("style");
        m.push_tag("style");
        assert_eq!(m.tags, vec!["style".to_string()]);
    }
}
