//! Checkpoint export (spec.md §4.9): snapshot every memory, document
//! and code chunk, link, and (optionally) centrality scores, the
//! brain-vault markdown tree, and config. JSON, optionally gzipped.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use succ_core::errors::SuccResult;
use succ_core::models::CentralityScore;
use succ_core::traits::storage::{ChunkCorpus, MemoryStore};
use succ_core::SuccConfig;

use crate::format::{BrainVaultFile, Checkpoint, CheckpointData};

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub include_centrality: Option<Vec<CentralityScore>>,
    pub include_brain_vault: Option<Vec<BrainVaultFile>>,
    pub include_config: Option<SuccConfig>,
    pub gzip: bool,
}

pub fn build_checkpoint(store: &dyn MemoryStore, project_name: &str, opts: ExportOptions) -> SuccResult<Checkpoint> {
    let now = chrono::Utc::now();
    let memories = store.all_valid(now)?;
    let documents = store.all_chunks(ChunkCorpus::Document)?;
    let code_chunks = store.all_chunks(ChunkCorpus::Code)?;
    let memory_links = store.list_all_links()?;

    let data = CheckpointData {
        memories,
        documents,
        code_chunks,
        memory_links,
        centrality_scores: opts.include_centrality,
        brain_vault: opts.include_brain_vault,
        config: opts.include_config,
    };

    Ok(Checkpoint::new(project_name.to_string(), data))
}

/// Serializes `checkpoint` to JSON, gzip-compressing when requested
/// (spec.md §6: ".gz suffix signals gzip").
pub fn serialize(checkpoint: &Checkpoint, gzip: bool) -> SuccResult<Vec<u8>> {
    let json = serde_json::to_vec_pretty(checkpoint)
        .map_err(|e| succ_core::errors::CheckpointError::Malformed { reason: e.to_string() })?;

    if !gzip {
        return Ok(json);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| succ_core::errors::CheckpointError::Malformed { reason: e.to_string() })?;
    encoder
        .finish()
        .map_err(|e| succ_core::errors::CheckpointError::Malformed { reason: e.to_string() }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::CheckpointData;

    #[test]
    fn serialize_without_gzip_is_plain_json() {
        let checkpoint = Checkpoint::new("proj".to_string(), CheckpointData::default());
        let bytes = serialize(&checkpoint, false).unwrap();
        assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_ok());
    }

    #[test]
    fn serialize_with_gzip_round_trips() {
        let checkpoint = Checkpoint::new("proj".to_string(), CheckpointData::default());
        let compressed = serialize(&checkpoint, true).unwrap();
        use flate2::read::GzDecoder;
        use std::io::Read;
        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();
        let restored: Checkpoint = serde_json::from_str(&decompressed).unwrap();
        assert_eq!(restored.project_name, "proj");
    }
}
