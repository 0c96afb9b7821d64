//! Heuristic content-quality scoring (C10): length, identifier density,
//! signal-to-noise ratio, and memory type combine into one `[0, 1]` score
//! compared against `quality_threshold` on the write path.

pub mod dimensions;
pub mod engine;

pub use engine::{HeuristicQualityScorer, DEFAULT_QUALITY_THRESHOLD};
