use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logged whenever a capability's fallback chain (C2 embedder today;
/// potentially `Llm` later) skips its primary implementation. Surfaced
/// through the observability layer so degraded-mode operation is
/// visible instead of silent.
#[derive(Debug, Clone, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
