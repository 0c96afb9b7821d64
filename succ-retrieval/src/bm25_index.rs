//! Per-corpus BM25 index (spec.md §4.4): one of these exists per corpus
//! (memories, documents, code). Writes only mark the index dirty; the
//! whole scorer is rebuilt atomically from the retained contents on the
//! next `search`, since the `bm25` crate's `Scorer` has no incremental
//! remove.

use std::collections::HashMap;

use bm25::{Embedder, EmbedderBuilder, Scorer, Tokenizer};

use succ_core::constants::{BM25_B, BM25_K1};

use crate::tokenizer::WordTokenizer;

pub struct Bm25Index {
    contents: HashMap<String, String>,
    embedder: Option<Embedder<u32, WordTokenizer>>,
    scorer: Option<Scorer<String, u32>>,
    avgdl: f32,
    dirty: bool,
}

impl Default for Bm25Index {
    fn default() -> Self {
        Self::new()
    }
}

impl Bm25Index {
    pub fn new() -> Self {
        Self {
            contents: HashMap::new(),
            embedder: None,
            scorer: None,
            avgdl: 100.0,
            dirty: true,
        }
    }

    /// Insert or replace a document's content. Takes effect on the next
    /// `search` call.
    pub fn upsert(&mut self, id: impl Into<String>, content: impl Into<String>) {
        self.contents.insert(id.into(), content.into());
        self.dirty = true;
    }

    pub fn upsert_many<I: IntoIterator<Item = (String, String)>>(&mut self, items: I) {
        for (id, content) in items {
            self.contents.insert(id, content);
        }
        self.dirty = true;
    }

    pub fn remove(&mut self, id: &str) {
        self.contents.remove(id);
        self.dirty = true;
    }

    pub fn doc_count(&self) -> usize {
        self.contents.len()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn rebuild(&mut self) {
        let tokenizer = WordTokenizer;
        if self.contents.is_empty() {
            self.avgdl = 100.0;
        } else {
            let total: usize = self.contents.values().map(|c| tokenizer.tokenize(c).len()).sum();
            self.avgdl = (total as f32 / self.contents.len() as f32).max(1.0);
        }

        let embedder = EmbedderBuilder::<u32, WordTokenizer>::with_avgdl(self.avgdl)
            .b(BM25_B)
            .k1(BM25_K1)
            .build();

        let mut scorer = Scorer::new();
        for (id, content) in &self.contents {
            scorer.upsert(id, embedder.embed(content));
        }

        self.embedder = Some(embedder);
        self.scorer = Some(scorer);
        self.dirty = false;
    }

    /// Lexical top-`limit` matches for `query`, sorted by descending
    /// BM25 score. Rebuilds the index first if it's dirty.
    pub fn search(&mut self, query: &str, limit: usize) -> Vec<(String, f64)> {
        if self.dirty {
            self.rebuild();
        }
        let (Some(embedder), Some(scorer)) = (&self.embedder, &self.scorer) else {
            return Vec::new();
        };
        let query_embedding = embedder.embed(query);
        scorer
            .matches(&query_embedding)
            .into_iter()
            .take(limit)
            .map(|doc| (doc.id, doc.score as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ranks_exact_term_match_first() {
        let mut index = Bm25Index::new();
        index.upsert("1", "fn get_user_by_id(id: i32) -> User");
        index.upsert("2", "fn delete_session(id: i32) -> Result<()>");
        index.upsert("3", "struct DatabaseConnection { pool: Pool }");

        let results = index.search("get user", 10);
        assert!(!results.is_empty());
        assert_eq!(results[0].0, "1");
    }

    #[test]
    fn dirty_flag_triggers_rebuild_after_remove() {
        let mut index = Bm25Index::new();
        index.upsert("1", "authentication token refresh");
        index.upsert("2", "database connection pool");
        let _ = index.search("token", 10);

        index.remove("1");
        let results = index.search("token", 10);
        assert!(results.iter().all(|(id, _)| id != "1"));
    }

    #[test]
    fn empty_index_returns_no_matches() {
        let mut index = Bm25Index::new();
        assert!(index.search("anything", 5).is_empty());
    }
}
