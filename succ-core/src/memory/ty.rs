use serde::{Deserialize, Serialize};

/// The six memory types from spec.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Observation,
    Decision,
    Learning,
    Error,
    Pattern,
    DeadEnd,
}

impl MemoryType {
    /// `type_weight` term of the priority-score formula in spec.md §4.6.
    pub fn priority_weight(self) -> f64 {
        match self {
            MemoryType::Decision => 1.0,
            MemoryType::Error => 0.9,
            MemoryType::DeadEnd => 0.85,
            MemoryType::Pattern => 0.8,
            MemoryType::Learning => 0.7,
            MemoryType::Observation => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MemoryType::Observation => "observation",
            MemoryType::Decision => "decision",
            MemoryType::Learning => "learning",
            MemoryType::Error => "error",
            MemoryType::Pattern => "pattern",
            MemoryType::DeadEnd => "dead_end",
        }
    }

    pub fn all() -> [MemoryType; 6] {
        [
            MemoryType::Observation,
            MemoryType::Decision,
            MemoryType::Learning,
            MemoryType::Error,
            MemoryType::Pattern,
            MemoryType::DeadEnd,
        ]
    }
}

impl Default for MemoryType {
    fn default() -> Self {
        MemoryType::Observation
    }
}

impl std::str::FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "observation" => Ok(MemoryType::Observation),
            "decision" => Ok(MemoryType::Decision),
            "learning" => Ok(MemoryType::Learning),
            "error" => Ok(MemoryType::Error),
            "pattern" => Ok(MemoryType::Pattern),
            "dead_end" => Ok(MemoryType::DeadEnd),
            other => Err(format!("unknown memory type: {other}")),
        }
    }
}
