use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only token-event record (spec.md §3), used only for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Recall,
    Search,
    SearchCode,
    SessionSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct TokenEvent {
    pub event_type: EventType,
    pub query_count: u32,
    pub full_source_tokens: u64,
    pub returned_tokens: u64,
    pub ts: DateTime<Utc>,
}
