//! The memory write path (spec.md §4.1/§4.6): sanitize → quality gate →
//! embed → dedup → invariant detection → persist → auto-link.

use succ_core::errors::{SuccError, SuccResult};
use succ_core::memory::{MemoryId, MemoryType};
use succ_core::traits::embedding::Embedder;
use succ_core::traits::quality::QualityScorer;
use succ_core::traits::sanitizer::Sanitizer;
use succ_core::traits::storage::{MemoryStore, SaveOptions, SaveOutcome};

use crate::invariant::detect_invariant;

/// Caller-supplied metadata for a single write. Mirrors `SaveOptions`
/// minus the fields this pipeline computes itself (quality score,
/// is_invariant).
#[derive(Debug, Clone, Default)]
pub struct WriteRequest {
    pub tags: Vec<String>,
    pub source: String,
    pub memory_type: MemoryType,
    pub valid_from: Option<chrono::DateTime<chrono::Utc>>,
    pub valid_until: Option<chrono::DateTime<chrono::Utc>>,
}

pub struct WritePipeline<'a> {
    pub store: &'a dyn MemoryStore,
    pub embedder: &'a dyn Embedder,
    pub sanitizer: &'a dyn Sanitizer,
    pub quality_scorer: &'a dyn QualityScorer,
    pub quality_threshold: f64,
    pub dedup_threshold: f64,
    pub sensitive_auto_redact: bool,
    pub invariant_similarity_threshold: f64,
    pub canonical_invariant_refs: &'a [Vec<f32>],
}

/// Outcome of a write, carrying the embedding alongside the storage
/// result so the caller can feed a fresh memory straight into
/// knowledge-graph auto-linking without re-embedding it.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub outcome: SaveOutcome,
    pub embedding: Vec<f32>,
}

impl<'a> WritePipeline<'a> {
    /// Runs the full write path for one piece of content. Returns the
    /// outcome from storage (fresh write or pointer to a duplicate)
    /// plus the embedding used, for the caller to auto-link on a fresh
    /// write (spec.md §4.7: "after a memory is saved").
    pub fn write(&self, content: &str, request: WriteRequest) -> SuccResult<WriteOutcome> {
        let sanitized = self.sanitizer.sanitize(content)?;
        if sanitized.has_sensitive && !self.sensitive_auto_redact {
            let finding = sanitized
                .redactions
                .first()
                .expect("has_sensitive implies at least one redaction");
            return Err(SuccError::Privacy(succ_core::errors::PrivacyError::Blocked {
                field: finding.category.clone(),
                finding: finding.placeholder.clone(),
            }));
        }
        let text = if sanitized.has_sensitive {
            &sanitized.text
        } else {
            content
        };

        let (quality_score, quality_factors) = self.quality_scorer.score(text, request.memory_type);
        if quality_score < self.quality_threshold {
            return Err(SuccError::QualityTooLow {
                reason: format!("score {quality_score:.2} below threshold {:.2}", self.quality_threshold),
            });
        }

        let embedding = self.embedder.embed(text)?;

        if let Some((existing_id, similarity)) = self.store.find_similar(&embedding, self.dedup_threshold)? {
            return Ok(WriteOutcome {
                outcome: SaveOutcome { id: existing_id, duplicate: similarity >= self.dedup_threshold },
                embedding,
            });
        }

        let is_invariant = detect_invariant(
            text,
            Some(&embedding),
            self.canonical_invariant_refs,
            self.invariant_similarity_threshold,
        );

        let opts = SaveOptions {
            tags: request.tags,
            source: request.source,
            memory_type: request.memory_type,
            quality_score,
            quality_factors,
            valid_from: request.valid_from,
            valid_until: request.valid_until,
            is_invariant,
        };

        let outcome = self.store.save(text, &embedding, opts)?;
        Ok(WriteOutcome { outcome, embedding })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use succ_core::memory::{Memory, MemoryType};
    use succ_core::models::{Chunk, MemoryLink, RelationType, TokenEvent};
    use succ_core::traits::embedding::Embedder;
    use succ_core::traits::quality::QualityScorer;
    use succ_core::traits::sanitizer::{Redaction, SanitizedText, Sanitizer};
    use succ_core::traits::storage::{
        BatchItem, BatchResult, ChunkCorpus, MemoryStore, SaveOptions, SaveOutcome, SessionStats, StaleReport,
    };

    use super::*;

    /// Flags every write as containing a credit-card-shaped secret.
    struct AlwaysSensitive;
    impl Sanitizer for AlwaysSensitive {
        fn sanitize(&self, text: &str) -> SuccResult<SanitizedText> {
            Ok(SanitizedText {
                has_sensitive: true,
                text: text.replace("4111", "[REDACTED]"),
                redactions: vec![Redaction {
                    category: "credit_card".to_string(),
                    placeholder: "[REDACTED]".to_string(),
                    start: 0,
                    end: 4,
                    confidence: 0.99,
                }],
            })
        }
    }

    struct StubEmbedder;
    impl Embedder for StubEmbedder {
        fn embed(&self, _text: &str) -> SuccResult<Vec<f32>> {
            unimplemented!("block mode must return before embedding")
        }
        fn embed_batch(&self, _texts: &[String]) -> SuccResult<Vec<Vec<f32>>> {
            unimplemented!()
        }
        fn dimensions(&self) -> usize {
            3
        }
        fn name(&self) -> &str {
            "stub"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    struct StubQualityScorer;
    impl QualityScorer for StubQualityScorer {
        fn score(&self, _content: &str, _memory_type: MemoryType) -> (f64, succ_core::memory::QualityFactors) {
            unimplemented!("block mode must return before scoring")
        }
    }

    /// A `MemoryStore` whose methods all panic — block mode must never
    /// reach storage.
    struct UnreachableStore;
    impl MemoryStore for UnreachableStore {
        fn save(&self, _content: &str, _embedding: &[f32], _opts: SaveOptions) -> SuccResult<SaveOutcome> {
            unimplemented!()
        }
        fn save_batch(&self, _items: &[BatchItem], _dedup_threshold: f64) -> SuccResult<BatchResult> {
            unimplemented!()
        }
        fn restore(&self, _memory: &Memory) -> SuccResult<MemoryId> {
            unimplemented!()
        }
        fn set_invalidated_by(&self, _id: MemoryId, _invalidated_by: MemoryId) -> SuccResult<()> {
            unimplemented!()
        }
        fn find_similar(&self, _embedding: &[f32], _threshold: f64) -> SuccResult<Option<(MemoryId, f64)>> {
            unimplemented!()
        }
        fn search_by_vector(&self, _embedding: &[f32], _k: usize, _threshold: f64) -> SuccResult<Vec<(MemoryId, f64)>> {
            unimplemented!()
        }
        fn get_by_id(&self, _id: MemoryId) -> SuccResult<Option<Memory>> {
            unimplemented!()
        }
        fn get_bulk(&self, _ids: &[MemoryId]) -> SuccResult<Vec<Memory>> {
            unimplemented!()
        }
        fn delete(&self, _id: MemoryId) -> SuccResult<()> {
            unimplemented!()
        }
        fn update_tags(&self, _id: MemoryId, _tags: Vec<String>) -> SuccResult<()> {
            unimplemented!()
        }
        fn increment_access_batch(&self, _ids: &[MemoryId]) -> SuccResult<()> {
            unimplemented!()
        }
        fn increment_correction_count(&self, _id: MemoryId, _invalidated: MemoryId) -> SuccResult<()> {
            unimplemented!()
        }
        fn reinforce(&self, _id: MemoryId) -> SuccResult<()> {
            unimplemented!()
        }
        fn all_valid(&self, _now: DateTime<Utc>) -> SuccResult<Vec<Memory>> {
            unimplemented!()
        }
        fn count_by_type(&self) -> SuccResult<Vec<(MemoryType, usize)>> {
            unimplemented!()
        }
        fn recent(&self, _limit: usize) -> SuccResult<Vec<Memory>> {
            unimplemented!()
        }
        fn upsert_chunks(
            &self,
            _corpus: ChunkCorpus,
            _file_path: &str,
            _content_hash: &str,
            _chunks: Vec<Chunk>,
        ) -> SuccResult<()> {
            unimplemented!()
        }
        fn delete_by_path(&self, _corpus: ChunkCorpus, _file_path: &str) -> SuccResult<()> {
            unimplemented!()
        }
        fn chunks_for_path(&self, _corpus: ChunkCorpus, _file_path: &str) -> SuccResult<Vec<Chunk>> {
            unimplemented!()
        }
        fn all_chunks(&self, _corpus: ChunkCorpus) -> SuccResult<Vec<Chunk>> {
            unimplemented!()
        }
        fn get_stale_files(&self, _corpus: ChunkCorpus, _project_root: &std::path::Path) -> SuccResult<StaleReport> {
            unimplemented!()
        }
        fn create_link(&self, _link: MemoryLink) -> SuccResult<MemoryLink> {
            unimplemented!()
        }
        fn delete_link(&self, _id: u64) -> SuccResult<()> {
            unimplemented!()
        }
        fn update_link(&self, _id: u64, _relation: RelationType, _weight: f64, _llm_enriched: bool) -> SuccResult<()> {
            unimplemented!()
        }
        fn links_for(&self, _memory_id: MemoryId) -> SuccResult<(Vec<MemoryLink>, Vec<MemoryLink>)> {
            unimplemented!()
        }
        fn list_all_links(&self) -> SuccResult<Vec<MemoryLink>> {
            unimplemented!()
        }
        fn link_exists(&self, _a: MemoryId, _b: MemoryId) -> SuccResult<bool> {
            unimplemented!()
        }
        fn session_stats(&self) -> SessionStats {
            unimplemented!()
        }
        fn record_token_event(&self, _event: TokenEvent) -> SuccResult<()> {
            unimplemented!()
        }
        fn vacuum(&self) -> SuccResult<()> {
            unimplemented!()
        }
    }

    fn pipeline<'a>(
        store: &'a UnreachableStore,
        embedder: &'a StubEmbedder,
        sanitizer: &'a AlwaysSensitive,
        quality_scorer: &'a StubQualityScorer,
        auto_redact: bool,
    ) -> WritePipeline<'a> {
        WritePipeline {
            store,
            embedder,
            sanitizer,
            quality_scorer,
            quality_threshold: 0.0,
            dedup_threshold: 0.92,
            sensitive_auto_redact: auto_redact,
            invariant_similarity_threshold: 0.9,
            canonical_invariant_refs: &[],
        }
    }

    #[test]
    fn block_mode_rejects_sensitive_content_before_touching_storage() {
        let store = UnreachableStore;
        let embedder = StubEmbedder;
        let sanitizer = AlwaysSensitive;
        let quality_scorer = StubQualityScorer;
        let wp = pipeline(&store, &embedder, &sanitizer, &quality_scorer, false);

        let err = wp.write("card 4111111111111111", WriteRequest::default()).unwrap_err();
        assert_eq!(err.kind(), "Sensitive");
        match err {
            SuccError::Privacy(succ_core::errors::PrivacyError::Blocked { field, finding }) => {
                assert_eq!(field, "credit_card");
                assert_eq!(finding, "[REDACTED]");
            }
            other => panic!("expected Privacy::Blocked, got {other:?}"),
        }
    }
}

/// Resolves which memory a write corrects, if the caller named one
/// explicitly (spec.md §4.6 correction protocol is opt-in: the writer
/// decides a new memory supersedes an old one, it isn't inferred).
pub fn apply_correction_if_requested(
    store: &dyn MemoryStore,
    new_id: MemoryId,
    supersedes: Option<MemoryId>,
) -> SuccResult<()> {
    if let Some(old_id) = supersedes {
        crate::correction::correct(store, new_id, old_id)?;
    }
    Ok(())
}
