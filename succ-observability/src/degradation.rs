//! Tracks capability-fallback events: component, failure mode,
//! fallback used, timestamp, recovery status (spec.md §5 "degraded
//! mode" visibility).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use succ_core::models::DegradationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks all degradation events for the lifetime of one engine
/// instance. Not persisted: a fresh process starts with an empty
/// tracker and relies on live fallback events to repopulate it.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: DegradationEvent) {
        tracing::warn!(
            component = %event.component,
            failure = %event.failure,
            fallback = %event.fallback_used,
            "degradation triggered"
        );
        self.events.push(TrackedDegradation { event, recovery_status: RecoveryStatus::Active, recovered_at: None });
    }

    /// Marks the most recent active degradation for `component` as
    /// recovered.
    pub fn mark_recovered(&mut self, component: &str) {
        let now = Utc::now();
        for tracked in self.events.iter_mut().rev() {
            if tracked.event.component == component && tracked.recovery_status == RecoveryStatus::Active {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(now);
                break;
            }
        }
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events.iter().filter(|t| t.recovery_status == RecoveryStatus::Active).collect()
    }

    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(window_secs);
        self.events.iter().filter(|t| t.event.component == component && t.event.timestamp > cutoff).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(component: &str) -> DegradationEvent {
        DegradationEvent {
            component: component.to_string(),
            failure: "timeout".to_string(),
            fallback_used: "cache".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn recorded_event_is_active() {
        let mut tracker = DegradationTracker::new();
        tracker.record(event("embedder"));
        assert_eq!(tracker.active_degradations().len(), 1);
    }

    #[test]
    fn mark_recovered_clears_active_status() {
        let mut tracker = DegradationTracker::new();
        tracker.record(event("embedder"));
        tracker.mark_recovered("embedder");
        assert!(tracker.active_degradations().is_empty());
    }

    #[test]
    fn mark_recovered_is_a_noop_for_unknown_component() {
        let mut tracker = DegradationTracker::new();
        tracker.record(event("embedder"));
        tracker.mark_recovered("llm");
        assert_eq!(tracker.active_degradations().len(), 1);
    }
}
