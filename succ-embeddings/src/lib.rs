//! # succ-embeddings
//!
//! Concrete `Embedder` (C2): a local/remote provider fallback chain, a
//! two-tier (in-memory + sqlite) embedding cache, and the batch worker
//! pool described in spec.md §4.2. `EmbeddingEngine` is the thing every
//! other crate injects as `Box<dyn Embedder>`.

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod providers;
pub mod worker_pool;

pub use engine::EmbeddingEngine;
