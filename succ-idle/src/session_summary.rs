//! Session summary (spec.md §4.8 job 3): asynchronous, LLM-backed.
//! Extracts bounded structured facts from a session transcript and
//! runs each through the normal write path.

use serde::Deserialize;

use succ_core::errors::SuccResult;
use succ_core::memory::{MemoryId, MemoryType};
use succ_core::traits::llm::Llm;
use succ_memory::write_path::{WritePipeline, WriteRequest};

const MIN_FACT_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
struct RawFact {
    content: String,
    #[serde(rename = "type")]
    memory_type: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    tags: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ExtractedFact {
    pub content: String,
    pub memory_type: MemoryType,
    pub confidence: f64,
    pub tags: Vec<String>,
}

fn prompt(transcript: &str) -> String {
    format!(
        "Extract durable facts worth remembering from this session transcript. \
         Respond as a JSON array of objects with fields content, type \
         (one of observation, decision, learning, error, pattern, dead_end), \
         confidence (0-1), tags (array of strings).\n\nTranscript:\n{transcript}"
    )
}

/// Parses the LLM's JSON response, dropping facts that fail the
/// bounds from spec.md §4.8 job 3 (length, valid type, confidence
/// range, string-only tags).
pub fn parse_facts(response: &str) -> Vec<ExtractedFact> {
    let raw: Vec<RawFact> = match serde_json::from_str(response) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    raw.into_iter()
        .filter_map(|f| {
            if f.content.trim().chars().count() < MIN_FACT_CHARS {
                return None;
            }
            let memory_type: MemoryType = f.memory_type.parse().ok()?;
            let confidence = f.confidence.clamp(0.0, 1.0);
            let tags = f.tags.into_iter().filter_map(|t| t.as_str().map(String::from)).collect();
            Some(ExtractedFact { content: f.content, memory_type, confidence, tags })
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SessionSummaryReport {
    pub extracted: usize,
    pub written: Vec<MemoryId>,
    pub rejected: usize,
}

pub async fn summarize_session(
    pipeline: &WritePipeline<'_>,
    llm: &dyn Llm,
    transcript: &str,
    timeout_secs: u64,
) -> SuccResult<SessionSummaryReport> {
    let response = llm.complete(&prompt(transcript), timeout_secs).await?;
    let facts = parse_facts(&response);

    let mut report = SessionSummaryReport { extracted: facts.len(), ..Default::default() };
    for fact in facts {
        let request = WriteRequest {
            tags: fact.tags,
            source: "session_summary".to_string(),
            memory_type: fact.memory_type,
            valid_from: None,
            valid_until: None,
        };
        match pipeline.write(&fact.content, request) {
            Ok(outcome) if !outcome.outcome.duplicate => report.written.push(outcome.outcome.id),
            Ok(_) => {}
            Err(_) => report.rejected += 1,
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_short_facts() {
        let response = r#"[{"content": "too short", "type": "observation", "confidence": 0.5, "tags": []}]"#;
        assert!(parse_facts(response).is_empty());
    }

    #[test]
    fn accepts_well_formed_fact() {
        let response = r#"[{"content": "this is a sufficiently long fact about the build pipeline breaking", "type": "error", "confidence": 0.9, "tags": ["ci"]}]"#;
        let facts = parse_facts(response);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].memory_type, MemoryType::Error);
    }

    #[test]
    fn drops_fact_with_unknown_type() {
        let response = r#"[{"content": "this is a sufficiently long fact but with a bogus type field set", "type": "nonsense", "confidence": 0.5, "tags": []}]"#;
        assert!(parse_facts(response).is_empty());
    }

    #[test]
    fn clamps_out_of_range_confidence() {
        let response = r#"[{"content": "this is a sufficiently long fact with an out of range confidence value", "type": "learning", "confidence": 4.2, "tags": []}]"#;
        let facts = parse_facts(response);
        assert_eq!(facts[0].confidence, 1.0);
    }

    #[test]
    fn malformed_json_yields_no_facts() {
        assert!(parse_facts("not json at all").is_empty());
    }
}
