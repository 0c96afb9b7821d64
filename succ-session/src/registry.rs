//! Session registry (spec.md §4.11): `{session_id → {transcript_path,
//! last_activity, had_user_prompt}}`, held in memory by the daemon.
//! Not synchronized across processes (spec.md §5).

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// One session's state. Cloned out of the registry on read, so callers
/// never hold a lock across an `await`.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub session_id: String,
    pub transcript_path: Option<String>,
    pub last_activity: DateTime<Utc>,
    pub had_user_prompt: bool,
}

impl SessionEntry {
    fn new(session_id: String) -> Self {
        Self { session_id, transcript_path: None, last_activity: Utc::now(), had_user_prompt: false }
    }
}

/// Thread-safe registry keyed by session id.
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self { sessions: DashMap::new() }
    }

    /// Registers a session. Idempotent: re-registering an existing id
    /// resets its `transcript_path` but preserves `had_user_prompt`.
    pub fn register(&self, session_id: &str, transcript_path: Option<String>) {
        self.sessions
            .entry(session_id.to_string())
            .and_modify(|entry| {
                entry.transcript_path = transcript_path.clone();
                entry.last_activity = Utc::now();
            })
            .or_insert_with(|| {
                let mut entry = SessionEntry::new(session_id.to_string());
                entry.transcript_path = transcript_path;
                entry
            });
    }

    pub fn unregister(&self, session_id: &str) -> Option<SessionEntry> {
        self.sessions.remove(session_id).map(|(_, v)| v)
    }

    /// Records activity on `session_id`. Per spec.md §4.11, activity on
    /// an unknown id auto-registers it rather than erroring.
    pub fn record_activity(&self, session_id: &str, had_user_prompt: bool) {
        self.sessions
            .entry(session_id.to_string())
            .and_modify(|entry| {
                entry.last_activity = Utc::now();
                entry.had_user_prompt = entry.had_user_prompt || had_user_prompt;
            })
            .or_insert_with(|| {
                let mut entry = SessionEntry::new(session_id.to_string());
                entry.had_user_prompt = had_user_prompt;
                entry
            });
    }

    pub fn get(&self, session_id: &str) -> Option<SessionEntry> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.sessions.iter().map(|r| r.key().clone()).collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_on_unknown_session_auto_registers() {
        let registry = SessionRegistry::new();
        registry.record_activity("s1", true);
        let entry = registry.get("s1").unwrap();
        assert!(entry.had_user_prompt);
    }

    #[test]
    fn had_user_prompt_is_sticky_once_set() {
        let registry = SessionRegistry::new();
        registry.record_activity("s1", true);
        registry.record_activity("s1", false);
        assert!(registry.get("s1").unwrap().had_user_prompt);
    }

    #[test]
    fn unregister_removes_the_session() {
        let registry = SessionRegistry::new();
        registry.register("s1", None);
        assert_eq!(registry.len(), 1);
        registry.unregister("s1");
        assert!(registry.is_empty());
    }

    #[test]
    fn register_resets_transcript_path_but_keeps_prompt_flag() {
        let registry = SessionRegistry::new();
        registry.record_activity("s1", true);
        registry.register("s1", Some("path.jsonl".to_string()));
        let entry = registry.get("s1").unwrap();
        assert!(entry.had_user_prompt);
        assert_eq!(entry.transcript_path.as_deref(), Some("path.jsonl"));
    }
}
