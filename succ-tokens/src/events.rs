use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use succ_core::models::{EventType, TokenEvent};

/// Running totals for one `EventType`.
#[derive(Debug, Clone, Default)]
pub struct EventTally {
    pub query_count: u64,
    pub full_source_tokens: u64,
    pub returned_tokens: u64,
}

impl EventTally {
    fn record(&mut self, event: &TokenEvent) {
        self.query_count += event.query_count as u64;
        self.full_source_tokens += event.full_source_tokens;
        self.returned_tokens += event.returned_tokens;
    }

    /// Tokens saved by returning a filtered/ranked result instead of the
    /// full source set, summed across every recorded event.
    pub fn tokens_saved(&self) -> u64 {
        self.full_source_tokens.saturating_sub(self.returned_tokens)
    }
}

/// Append-only in-memory ledger of `TokenEvent`s (spec.md §3), plus the
/// aggregate stats surface the daemon's status endpoint reports from.
pub struct TokenLedger {
    events: RwLock<Vec<TokenEvent>>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn record(
        &self,
        event_type: EventType,
        full_source_tokens: u64,
        returned_tokens: u64,
        ts: DateTime<Utc>,
    ) {
        let event = TokenEvent {
            event_type,
            query_count: 1,
            full_source_tokens,
            returned_tokens,
            ts,
        };
        self.events.write().expect("token ledger lock poisoned").push(event);
    }

    /// Most recent `limit` events, newest first.
    pub fn recent_events(&self, limit: usize) -> Vec<TokenEvent> {
        let events = self.events.read().expect("token ledger lock poisoned");
        events.iter().rev().take(limit).cloned().collect()
    }

    /// Totals grouped by event type, for `/api/status` style reporting.
    pub fn totals_by_event_type(&self) -> BTreeMap<EventType, EventTally> {
        let events = self.events.read().expect("token ledger lock poisoned");
        let mut totals: BTreeMap<EventType, EventTally> = BTreeMap::new();
        for event in events.iter() {
            totals.entry(event.event_type).or_default().record(event);
        }
        totals
    }

    pub fn len(&self) -> usize {
        self.events.read().expect("token ledger lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ledger_has_no_totals() {
        let ledger = TokenLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.totals_by_event_type().is_empty());
    }

    #[test]
    fn recent_events_are_returned_newest_first() {
        let ledger = TokenLedger::new();
        let t0 = Utc::now();
        ledger.record(EventType::Search, 100, 20, t0);
        ledger.record(EventType::Recall, 50, 50, t0);
        let recent = ledger.recent_events(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event_type, EventType::Recall);
        assert_eq!(recent[1].event_type, EventType::Search);
    }

    #[test]
    fn totals_accumulate_per_event_type() {
        let ledger = TokenLedger::new();
        let now = Utc::now();
        ledger.record(EventType::Search, 100, 20, now);
        ledger.record(EventType::Search, 200, 40, now);
        ledger.record(EventType::Recall, 30, 30, now);

        let totals = ledger.totals_by_event_type();
        let search = &totals[&EventType::Search];
        assert_eq!(search.query_count, 2);
        assert_eq!(search.full_source_tokens, 300);
        assert_eq!(search.returned_tokens, 60);
        assert_eq!(search.tokens_saved(), 240);

        let recall = &totals[&EventType::Recall];
        assert_eq!(recall.query_count, 1);
        assert_eq!(recall.tokens_saved(), 0);
    }
}
