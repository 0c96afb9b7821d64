use serde::{Deserialize, Serialize};

/// Retriever centrality-boost configuration (spec.md §4.5 step 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphCentralityConfig {
    pub enabled: bool,
    pub boost_weight: f64,
}

impl Default for GraphCentralityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            boost_weight: crate::constants::DEFAULT_CENTRALITY_BOOST_WEIGHT,
        }
    }
}
