//! Lexical (BM25) and hybrid vector+lexical retrieval (C4/C5): a
//! per-corpus BM25 index, reciprocal-rank fusion, and the
//! `HybridRetriever` that drives the full search pipeline in
//! spec.md §4.5.

pub mod bm25_index;
pub mod query_kind;
pub mod retriever;
pub mod rrf;
pub mod tokenizer;

pub use bm25_index::Bm25Index;
pub use retriever::{HybridRetriever, RetrieveOptions};
