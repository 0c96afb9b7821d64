use serde::{Deserialize, Serialize};

use super::defaults;

/// Idle pipeline configuration (C8): which of the four jobs run, their
/// thresholds, and the wall-clock budget for the synchronous slice
/// before the rest is handed to detached workers (spec.md §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleReflectionConfig {
    pub enabled: bool,
    /// Which of `consolidation`, `reflection`, `session_summary`,
    /// `precompute` are enabled for this project.
    pub operations: Vec<String>,
    pub similarity_for_merge: f64,
    pub reflection_dedup_threshold: f64,
    pub max_memories_to_process: usize,
    pub timeout_seconds: u64,
}

impl Default for IdleReflectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            operations: vec![
                "consolidation".to_string(),
                "reflection".to_string(),
                "session_summary".to_string(),
                "precompute".to_string(),
            ],
            similarity_for_merge: crate::constants::DEFAULT_SIMILARITY_FOR_MERGE,
            reflection_dedup_threshold: crate::constants::DEFAULT_REFLECTION_DEDUP_THRESHOLD,
            max_memories_to_process: defaults::DEFAULT_MAX_MEMORIES_TO_PROCESS,
            timeout_seconds: defaults::DEFAULT_IDLE_TIMEOUT_SECONDS,
        }
    }
}
