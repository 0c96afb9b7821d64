use chrono::{DateTime, Utc};
use succ_core::config::RetentionConfig;
use succ_core::memory::Memory;

use crate::decay::confidence_decayed;

/// A retention-sweep eligibility verdict for one memory. Pinned memories
/// are never eligible (spec.md §3 invariant); sweeps are dry-run-first
/// per spec.md §7 — this function only classifies, callers decide
/// whether to act.
#[derive(Debug, Clone)]
pub struct ArchivalDecision {
    pub memory_id: u64,
    pub eligible: bool,
    pub decayed_confidence: f64,
    pub age_days: i64,
    pub reason: String,
}

/// Classify a memory for retention-sweep eligibility against `config`
/// as of `now`. A memory is eligible only once it is older than
/// `keep_threshold_days` *and* its decayed confidence has fallen past
/// `delete_threshold_days`'s implied age, and it is not pinned.
pub fn evaluate_archival(memory: &Memory, config: &RetentionConfig, now: DateTime<Utc>) -> ArchivalDecision {
    let age_days = (now - memory.created_at).num_days();

    if memory.is_pinned() {
        return ArchivalDecision {
            memory_id: memory.id,
            eligible: false,
            decayed_confidence: memory.quality_score,
            age_days,
            reason: "pinned".to_string(),
        };
    }

    let decayed = if config.use_temporal_decay {
        confidence_decayed(memory.quality_score, memory.last_accessed, now)
    } else {
        memory.quality_score
    };

    let eligible = age_days >= config.delete_threshold_days as i64;
    let reason = if eligible {
        format!(
            "age {age_days}d >= delete_threshold {}d (decayed confidence {decayed:.3})",
            config.delete_threshold_days
        )
    } else if age_days >= config.keep_threshold_days as i64 {
        format!(
            "age {age_days}d within keep window (< delete_threshold {}d)",
            config.delete_threshold_days
        )
    } else {
        "below keep_threshold".to_string()
    };

    ArchivalDecision {
        memory_id: memory.id,
        eligible,
        decayed_confidence: decayed,
        age_days,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use succ_core::memory::{MemoryType, QualityFactors};

    fn memory_aged(days: i64, pinned: bool) -> Memory {
        let now = Utc::now();
        Memory {
            id: 1,
            content: "x".to_string(),
            embedding: vec![0.1],
            tags: vec![],
            source: "test".to_string(),
            memory_type: MemoryType::Observation,
            quality_score: 0.6,
            quality_factors: QualityFactors::new(),
            access_count: 0,
            last_accessed: now - Duration::days(days),
            created_at: now - Duration::days(days),
            valid_from: None,
            valid_until: None,
            is_invariant: pinned,
            correction_count: 0,
            invalidated_by: None,
        }
    }

    #[test]
    fn pinned_memories_are_never_eligible() {
        let m = memory_aged(10_000, true);
        let decision = evaluate_archival(&m, &RetentionConfig::default(), Utc::now());
        assert!(!decision.eligible);
        assert_eq!(decision.reason, "pinned");
    }

    #[test]
    fn young_memories_are_not_eligible() {
        let m = memory_aged(1, false);
        let decision = evaluate_archival(&m, &RetentionConfig::default(), Utc::now());
        assert!(!decision.eligible);
    }

    #[test]
    fn old_memories_past_delete_threshold_are_eligible() {
        let cfg = RetentionConfig {
            use_temporal_decay: true,
            keep_threshold_days: 90,
            delete_threshold_days: 365,
        };
        let m = memory_aged(400, false);
        let decision = evaluate_archival(&m, &cfg, Utc::now());
        assert!(decision.eligible);
    }
}
