use succ_core::memory::{MemoryType, QualityFactors};
use succ_core::traits::QualityScorer;

use crate::dimensions::{identifier_density_score, length_score, signal_to_noise_score};

/// Default `quality_threshold` (spec.md §4.10): writes scoring below this
/// are rejected rather than persisted.
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 0.3;

const LENGTH_WEIGHT: f64 = 0.30;
const IDENTIFIER_WEIGHT: f64 = 0.25;
const SIGNAL_NOISE_WEIGHT: f64 = 0.25;
const TYPE_WEIGHT: f64 = 0.20;

/// Heuristic quality scorer (C10): combines content length, identifier
/// density, signal-to-noise ratio, and memory type into a single `[0, 1]`
/// score.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicQualityScorer;

impl HeuristicQualityScorer {
    pub fn new() -> Self {
        Self
    }
}

impl QualityScorer for HeuristicQualityScorer {
    fn score(&self, content: &str, memory_type: MemoryType) -> (f64, QualityFactors) {
        let length = length_score(content);
        let identifiers = identifier_density_score(content);
        let signal_noise = signal_to_noise_score(content);
        let type_weight = memory_type.priority_weight();

        let overall = LENGTH_WEIGHT * length
            + IDENTIFIER_WEIGHT * identifiers
            + SIGNAL_NOISE_WEIGHT * signal_noise
            + TYPE_WEIGHT * type_weight;

        let mut factors = QualityFactors::new();
        factors.insert("length", length);
        factors.insert("identifiers", identifiers);
        factors.insert("signal_noise", signal_noise);
        factors.insert("type_weight", type_weight);

        (overall.clamp(0.0, 1.0), factors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_scores_near_zero() {
        let scorer = HeuristicQualityScorer::new();
        let (score, _) = scorer.score("", MemoryType::Observation);
        assert!(score < DEFAULT_QUALITY_THRESHOLD);
    }

    #[test]
    fn substantive_decision_scores_above_threshold() {
        let scorer = HeuristicQualityScorer::new();
        let content = "Decided to switch the retry backoff in src/net/client.rs from fixed delay to exponential_backoff_ms to fix connection_pool exhaustion under load";
        let (score, factors) = scorer.score(content, MemoryType::Decision);
        assert!(score > DEFAULT_QUALITY_THRESHOLD);
        assert!(factors.get("type_weight").is_some());
    }

    #[test]
    fn factors_are_all_present() {
        let scorer = HeuristicQualityScorer::new();
        let (_, factors) = scorer.score("some content here", MemoryType::Learning);
        for key in ["length", "identifiers", "signal_noise", "type_weight"] {
            assert!(factors.get(key).is_some(), "missing factor {key}");
        }
    }
}
