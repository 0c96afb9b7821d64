/// A chunk produced before embedding/persistence — `succ-memory` (C6)
/// embeds each draft's `content` and hands the result to `upsert_chunks`
/// (C1) as a `succ_core::models::Chunk`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkDraft {
    pub content: String,
    /// 1-based, inclusive.
    pub start_line: u32,
    /// 1-based, inclusive.
    pub end_line: u32,
    pub symbol_name: Option<String>,
    pub symbol_type: Option<String>,
}

impl ChunkDraft {
    pub fn plain(content: String, start_line: u32, end_line: u32) -> Self {
        Self { content, start_line, end_line, symbol_name: None, symbol_type: None }
    }
}
