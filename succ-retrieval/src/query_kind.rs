//! Query-type heuristics (spec.md §4.5): counting and multi-session
//! queries need a wider pre-fusion candidate pool than a normal lookup,
//! since the answer may depend on a long tail the default top-N would
//! truncate before RRF ever sees it.

const COUNTING_MARKERS: &[&str] = &[
    "how many", "how often", "count", "number of", "every time", "each time", "all the times",
];

const MULTI_SESSION_MARKERS: &[&str] = &["across sessions", "over time", "all sessions", "historically"];

pub fn needs_wide_fan_out(query: &str) -> bool {
    let q = query.to_lowercase();
    COUNTING_MARKERS.iter().any(|m| q.contains(m)) || MULTI_SESSION_MARKERS.iter().any(|m| q.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_counting_phrasing() {
        assert!(needs_wide_fan_out("how many times did we retry the migration"));
    }

    #[test]
    fn detects_multi_session_phrasing() {
        assert!(needs_wide_fan_out("what have we decided across sessions about auth"));
    }

    #[test]
    fn ordinary_lookup_does_not_fan_out() {
        assert!(!needs_wide_fan_out("what did we decide about the retry backoff"));
    }
}
