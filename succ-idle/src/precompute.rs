//! Precompute context (spec.md §4.8 job 4): asynchronous, LLM-backed.
//! Surfaces up to 5 memories relevant to a session transcript and asks
//! the LLM for a short briefing, written to a well-known path with the
//! previous briefing archived atomically on load.

use std::path::Path;

use succ_core::errors::SuccResult;
use succ_core::memory::Memory;
use succ_core::traits::embedding::Embedder;
use succ_core::traits::llm::Llm;
use succ_core::traits::storage::MemoryStore;

const MAX_BRIEFING_MEMORIES: usize = 5;
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "to", "of", "in", "on",
    "for", "with", "this", "that", "it", "as", "at", "be", "by", "from",
];

/// Crude keyword extraction: lowercased alphanumeric tokens, stopwords
/// and tokens shorter than 3 chars dropped, longest-first so the
/// embedding query favors distinctive terms.
fn extract_keywords(transcript: &str, limit: usize) -> String {
    let mut words: Vec<&str> = transcript
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    words.truncate(limit);
    words.join(" ")
}

fn select_briefing_memories(
    store: &dyn MemoryStore,
    embedder: &dyn Embedder,
    transcript: &str,
) -> SuccResult<Vec<Memory>> {
    let keywords = extract_keywords(transcript, 20);
    if !keywords.is_empty() {
        let embedding = embedder.embed(&keywords)?;
        let hits = store.search_by_vector(&embedding, MAX_BRIEFING_MEMORIES, 0.0)?;
        if !hits.is_empty() {
            let ids: Vec<_> = hits.iter().map(|(id, _)| *id).collect();
            return store.get_bulk(&ids);
        }
    }
    let recent = store.recent(MAX_BRIEFING_MEMORIES)?;
    Ok(recent)
}

fn prompt(memories: &[Memory]) -> String {
    let mut prompt = String::from(
        "Write a 3-5 bullet briefing summarizing what's relevant from these memories \
         for someone resuming this project.\n\n",
    );
    for memory in memories {
        prompt.push_str("- ");
        prompt.push_str(&memory.content);
        prompt.push('\n');
    }
    prompt
}

pub async fn precompute_briefing(
    store: &dyn MemoryStore,
    embedder: &dyn Embedder,
    llm: &dyn Llm,
    transcript: &str,
    timeout_secs: u64,
) -> SuccResult<String> {
    let memories = select_briefing_memories(store, embedder, transcript)?;
    if memories.is_empty() {
        return Ok(String::new());
    }
    llm.complete(&prompt(&memories), timeout_secs).await
}

/// Writes `briefing` to `path`, archiving whatever was there before to
/// `path.with_extension("md.bak")` first. The archive-then-replace is
/// a rename, which is atomic on the same filesystem.
pub fn write_briefing_archiving_previous(path: &Path, briefing: &str) -> std::io::Result<()> {
    if path.exists() {
        let archive_path = path.with_extension("md.bak");
        std::fs::rename(path, archive_path)?;
    }
    std::fs::write(path, briefing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_keywords_drops_stopwords_and_short_words() {
        let keywords = extract_keywords("the build is broken on the ci pipeline for everyone", 10);
        assert!(!keywords.contains("the"));
        assert!(keywords.contains("broken") || keywords.contains("pipeline"));
    }

    #[test]
    fn extract_keywords_is_empty_for_all_stopwords() {
        assert_eq!(extract_keywords("the and or but", 10), "");
    }

    #[test]
    fn write_briefing_archives_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("briefing.md");
        std::fs::write(&path, "old briefing").unwrap();

        write_briefing_archiving_previous(&path, "new briefing").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new briefing");
        let archive = path.with_extension("md.bak");
        assert_eq!(std::fs::read_to_string(&archive).unwrap(), "old briefing");
    }

    #[test]
    fn write_briefing_without_prior_file_just_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("briefing.md");
        write_briefing_archiving_previous(&path, "first briefing").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first briefing");
    }
}
