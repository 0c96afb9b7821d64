use serde::{Deserialize, Serialize};

/// Degree-centrality score for one memory, recomputed periodically and
/// cached (spec.md §3, §4.7).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct CentralityScore {
    pub memory_id: u64,
    pub degree: u32,
    pub normalized_degree: f64,
}
