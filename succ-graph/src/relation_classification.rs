//! LLM relation classification (spec.md §4.7): walks unenriched
//! `similar_to` edges in batches, asking the LLM to pick one relation
//! label. A parse failure or LLM error still marks the edge enriched
//! (keeping it `similar_to`) so the same edge isn't retried forever.

use succ_core::errors::SuccResult;
use succ_core::models::{MemoryLink, RelationType};
use succ_core::traits::{Llm, MemoryStore};

const RELATION_PROMPT_LABELS: &str =
    "related, similar_to, caused_by, leads_to, contradicts, implements, supersedes, references";

fn prompt(source: &str, target: &str) -> String {
    format!(
        "Two notes from a developer's working memory:\n\nA: {source}\nB: {target}\n\n\
         Pick exactly one relation from this set that best describes how A relates to B: \
         {RELATION_PROMPT_LABELS}.\n\
         Respond with a single line: `<relation> <confidence 0-1>`, nothing else."
    )
}

fn parse_response(text: &str) -> Option<(RelationType, f64)> {
    let mut parts = text.trim().split_whitespace();
    let label = parts.next()?;
    let confidence: f64 = parts.next()?.parse().ok()?;
    let relation = RelationType::ALL.into_iter().find(|r| r.to_string() == label)?;
    Some((relation, confidence.clamp(0.0, 1.0)))
}

/// Classify one batch of unenriched edges (caller selects the batch,
/// e.g. `list_all_links().into_iter().filter(|l| !l.llm_enriched)`).
pub async fn classify_batch(
    store: &dyn MemoryStore,
    llm: &dyn Llm,
    edges: &[MemoryLink],
    timeout_secs: u64,
) -> SuccResult<usize> {
    let mut updated = 0;
    for edge in edges {
        let Some(source) = store.get_by_id(edge.source_id)? else { continue };
        let Some(target) = store.get_by_id(edge.target_id)? else { continue };

        match llm.complete(&prompt(&source.content, &target.content), timeout_secs).await {
            Ok(text) => match parse_response(&text) {
                Some((relation, confidence)) => {
                    store.update_link(edge.id, relation, confidence, true)?;
                }
                None => {
                    tracing::warn!(edge_id = edge.id, "unparseable relation classification, keeping similar_to");
                    store.update_link(edge.id, RelationType::SimilarTo, edge.weight, true)?;
                }
            },
            Err(e) => {
                tracing::warn!(edge_id = edge.id, error = %e, "relation classification call failed");
                store.update_link(edge.id, RelationType::SimilarTo, edge.weight, true)?;
            }
        }
        updated += 1;
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_response() {
        let (relation, confidence) = parse_response("caused_by 0.82").unwrap();
        assert_eq!(relation, RelationType::CausedBy);
        assert!((confidence - 0.82).abs() < 1e-9);
    }

    #[test]
    fn rejects_unknown_label() {
        assert!(parse_response("frobnicates 0.9").is_none());
    }

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        let (_, confidence) = parse_response("related 1.5").unwrap();
        assert!((confidence - 1.0).abs() < 1e-9);
    }
}
