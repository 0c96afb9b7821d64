use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The eight relation types between memories (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Related,
    SimilarTo,
    CausedBy,
    LeadsTo,
    Contradicts,
    Implements,
    Supersedes,
    References,
}

impl RelationType {
    /// Relations that are inherently directional (causal/derivational).
    /// Everything else (`related`, `similar_to`) is treated as
    /// undirected for similarity purposes per spec.md §9 design notes.
    pub fn is_directed(self) -> bool {
        matches!(
            self,
            RelationType::CausedBy
                | RelationType::LeadsTo
                | RelationType::Supersedes
                | RelationType::Implements
        )
    }

    pub const ALL: [RelationType; 8] = [
        RelationType::Related,
        RelationType::SimilarTo,
        RelationType::CausedBy,
        RelationType::LeadsTo,
        RelationType::Contradicts,
        RelationType::Implements,
        RelationType::Supersedes,
        RelationType::References,
    ];
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RelationType::Related => "related",
            RelationType::SimilarTo => "similar_to",
            RelationType::CausedBy => "caused_by",
            RelationType::LeadsTo => "leads_to",
            RelationType::Contradicts => "contradicts",
            RelationType::Implements => "implements",
            RelationType::Supersedes => "supersedes",
            RelationType::References => "references",
        };
        write!(f, "{s}")
    }
}

/// An edge between two memories. Storage keys on `(min(source,target),
/// max(source,target))` so exactly one edge exists per unordered pair
/// (spec.md §3, §9) regardless of which endpoint was passed as source.
#[derive(Debug, Clone, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct MemoryLink {
    pub id: u64,
    pub source_id: u64,
    pub target_id: u64,
    pub relation: RelationType,
    pub weight: f64,
    pub llm_enriched: bool,
    pub created_at: DateTime<Utc>,
}

impl MemoryLink {
    /// The unordered-pair key used to enforce "one edge per pair".
    pub fn pair_key(&self) -> (u64, u64) {
        if self.source_id <= self.target_id {
            (self.source_id, self.target_id)
        } else {
            (self.target_id, self.source_id)
        }
    }
}
