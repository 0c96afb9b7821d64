//! Reflection synthesis (spec.md §4.8 job 2): asynchronous, LLM-backed.
//! Community clusters of unreflected observations are summarized into
//! `pattern`/`learning` memories, deduped against the store at a
//! looser threshold than the write path.

use succ_core::errors::SuccResult;
use succ_core::memory::{Memory, MemoryId, MemoryType};
use succ_core::traits::embedding::Embedder;
use succ_core::traits::llm::Llm;
use succ_core::traits::storage::{MemoryStore, SaveOptions};

const REFLECTED_TAG: &str = "reflected";
const MAX_ITEMS_PER_CLUSTER: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct ReflectionReport {
    pub clusters_processed: usize,
    pub created: Vec<MemoryId>,
    pub reinforced: Vec<MemoryId>,
}

fn parse_llm_items(response: &str) -> Vec<(MemoryType, String)> {
    response
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (kind, rest) = line.split_once(':')?;
            let memory_type = match kind.trim().to_ascii_lowercase().as_str() {
                "pattern" => MemoryType::Pattern,
                "learning" => MemoryType::Learning,
                _ => return None,
            };
            let content = rest.trim();
            if content.is_empty() {
                None
            } else {
                Some((memory_type, content.to_string()))
            }
        })
        .take(MAX_ITEMS_PER_CLUSTER)
        .collect()
}

fn build_prompt(observations: &[&Memory]) -> String {
    let mut prompt = String::from(
        "Given these observations, identify 1-3 high-level patterns or learnings. \
         Respond one per line as \"pattern: <text>\" or \"learning: <text>\".\n\n",
    );
    for observation in observations {
        prompt.push_str("- ");
        prompt.push_str(&observation.content);
        prompt.push('\n');
    }
    prompt
}

/// Runs reflection over one community cluster's unreflected
/// observations. Caller filters clusters to size ≥5 and caps the
/// observation slice to `MAX_OBSERVATIONS_PER_CLUSTER` before calling.
pub async fn reflect_cluster(
    store: &dyn MemoryStore,
    embedder: &dyn Embedder,
    llm: &dyn Llm,
    observations: &[Memory],
    dedup_threshold: f64,
    timeout_secs: u64,
) -> SuccResult<ReflectionReport> {
    let mut report = ReflectionReport::default();
    if observations.is_empty() {
        return Ok(report);
    }
    report.clusters_processed = 1;

    let unreflected: Vec<&Memory> = observations.iter().filter(|m| !m.has_tag(REFLECTED_TAG)).collect();
    if unreflected.is_empty() {
        return Ok(report);
    }

    let prompt = build_prompt(&unreflected);
    let response = llm.complete(&prompt, timeout_secs).await?;
    let items = parse_llm_items(&response);

    for (memory_type, content) in items {
        let embedding = embedder.embed(&content)?;
        match store.find_similar(&embedding, dedup_threshold)? {
            Some((existing_id, _)) => {
                if let Some(existing) = store.get_by_id(existing_id)? {
                    if existing.memory_type == MemoryType::Pattern || existing.memory_type == MemoryType::Learning {
                        store.reinforce(existing_id)?;
                        report.reinforced.push(existing_id);
                    }
                }
            }
            None => {
                let outcome = store.save(
                    &content,
                    &embedding,
                    SaveOptions {
                        tags: vec![],
                        source: "reflection".to_string(),
                        memory_type,
                        quality_score: 0.7,
                        quality_factors: succ_core::memory::QualityFactors::new(),
                        valid_from: None,
                        valid_until: None,
                        is_invariant: false,
                    },
                )?;
                report.created.push(outcome.id);
            }
        }
    }

    let ids: Vec<MemoryId> = unreflected.iter().map(|m| m.id).collect();
    for id in ids {
        if let Some(mut memory) = store.get_by_id(id)? {
            memory.push_tag(REFLECTED_TAG);
            store.update_tags(id, memory.tags)?;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pattern_and_learning_lines() {
        let response = "pattern: always validate input\nlearning: tests catch regressions\nnoise line";
        let items = parse_llm_items(response);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, MemoryType::Pattern);
        assert_eq!(items[1].0, MemoryType::Learning);
    }

    #[test]
    fn caps_at_three_items() {
        let response = "pattern: a\nlearning: b\npattern: c\nlearning: d";
        assert_eq!(parse_llm_items(response).len(), 3);
    }

    #[test]
    fn ignores_malformed_lines() {
        let response = "just some prose with no colon marker for type";
        assert!(parse_llm_items(response).is_empty());
    }
}
