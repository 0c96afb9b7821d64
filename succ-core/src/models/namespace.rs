use serde::{Deserialize, Serialize};

/// Every record lives in a per-project namespace; a parallel global
/// namespace stores cross-project memories with identical shape
/// (spec.md §3). This is a thin tag, not a multi-tenant system — the
/// engine still owns a single store per `NamespaceId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub enum Namespace {
    Project(String),
    Global,
}

impl Namespace {
    pub fn as_key(&self) -> String {
        match self {
            Namespace::Project(name) => format!("project:{name}"),
            Namespace::Global => "global".to_string(),
        }
    }
}
