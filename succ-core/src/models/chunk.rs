use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document or code chunk (spec.md §3). Both corpora share this shape;
/// which corpus a chunk belongs to is a property of the table it lives
/// in, not of the struct.
#[derive(Debug, Clone, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Chunk {
    pub id: u64,
    pub file_path: String,
    /// Unique together with `file_path`.
    pub chunk_index: u32,
    pub content: String,
    /// 1-based, inclusive.
    pub start_line: u32,
    /// 1-based, inclusive.
    pub end_line: u32,
    pub embedding: Vec<f32>,
    pub symbol_name: Option<String>,
    pub symbol_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `file_path -> (content_hash, indexed_at)`. The sole source of truth
/// for "is this file fresh?" (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct FileHash {
    pub file_path: String,
    pub content_hash: String,
    pub indexed_at: DateTime<Utc>,
}

impl FileHash {
    pub fn compute(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }
}
