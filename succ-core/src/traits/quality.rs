use crate::memory::{MemoryType, QualityFactors};

/// Heuristic content-quality scoring (C10). Scores land in `[0, 1]`;
/// callers compare against `quality_threshold` before admitting a write.
pub trait QualityScorer: Send + Sync {
    fn score(&self, content: &str, memory_type: MemoryType) -> (f64, QualityFactors);
}
