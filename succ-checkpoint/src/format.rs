//! Checkpoint file format (spec.md §4.9, §6): a self-describing JSON
//! document, optionally gzip-compressed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use succ_core::constants::CHECKPOINT_SCHEMA_VERSION;
use succ_core::memory::Memory;
use succ_core::models::{Chunk, CentralityScore, MemoryLink};
use succ_core::SuccConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckpointData {
    pub memories: Vec<Memory>,
    pub documents: Vec<Chunk>,
    pub code_chunks: Vec<Chunk>,
    pub memory_links: Vec<MemoryLink>,
    #[serde(default)]
    pub centrality_scores: Option<Vec<CentralityScore>>,
    #[serde(default)]
    pub brain_vault: Option<Vec<BrainVaultFile>>,
    #[serde(default)]
    pub config: Option<SuccConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainVaultFile {
    pub relative_path: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckpointStats {
    pub memories_count: usize,
    pub documents_count: usize,
    pub links_count: usize,
    pub brain_files_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub project_name: String,
    pub engine_version: String,
    pub data: CheckpointData,
    pub stats: CheckpointStats,
}

impl Checkpoint {
    pub fn new(project_name: String, data: CheckpointData) -> Self {
        let stats = CheckpointStats {
            memories_count: data.memories.len(),
            documents_count: data.documents.len() + data.code_chunks.len(),
            links_count: data.memory_links.len(),
            brain_files_count: data.brain_vault.as_ref().map(Vec::len).unwrap_or(0),
        };
        Self {
            version: CHECKPOINT_SCHEMA_VERSION,
            created_at: Utc::now(),
            project_name,
            engine_version: succ_core::constants::VERSION.to_string(),
            data,
            stats,
        }
    }
}
