pub mod embedding;
pub mod llm;
pub mod parser;
pub mod quality;
pub mod sanitizer;
pub mod storage;

pub use embedding::Embedder;
pub use llm::Llm;
pub use parser::{Parser, Symbol, SymbolKind, Tree};
pub use quality::QualityScorer;
pub use sanitizer::{Redaction, SanitizedText, Sanitizer};
pub use storage::{
    BatchItem, BatchResult, ChunkCorpus, MemoryStore, SaveOptions, SaveOutcome, SessionStats,
    SkipReason, StaleReport,
};
