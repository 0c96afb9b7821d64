//! `EmbeddingEngine` — the concrete `Embedder` (C2) used by the rest of
//! the workspace. Coordinates provider fallback, the two-tier cache, and
//! the batch worker pool behind the single injected capability.

use std::sync::Mutex;

use succ_core::config::{EmbeddingConfig, EmbeddingMode};
use succ_core::constants::MAX_EMBEDDING_POOL_WORKERS;
use succ_core::errors::{EmbeddingError, SuccResult};
use succ_core::models::DegradationEvent;
use succ_core::traits::Embedder;
use tracing::info;

use crate::cache::{CacheCoordinator, L2Cache};
use crate::degradation::DegradationChain;
use crate::providers::{HashingFallback, LocalProvider, RemoteProvider};
use crate::worker_pool::{self, WorkerPool};

pub struct EmbeddingEngine {
    chain: Mutex<DegradationChain>,
    cache: CacheCoordinator,
    pool: WorkerPool,
    dimensions: usize,
}

impl EmbeddingEngine {
    /// Build the engine from config. `model_path` resolves a `Local`
    /// model file; for `Remote` mode the API key comes from
    /// `SUCC_EMBEDDING_API_KEY`, never from the config document.
    pub fn new(config: &EmbeddingConfig, model_path: Option<&str>, l2_cache: Option<L2Cache>) -> SuccResult<Self> {
        let mut chain = DegradationChain::new();

        match config.mode {
            EmbeddingMode::Local => {
                let path = model_path.ok_or_else(|| EmbeddingError::ModelLoadFailed {
                    path: "<unset>".to_string(),
                    reason: "local embedding mode requires a model path".to_string(),
                })?;
                match LocalProvider::load(path, config.dimension) {
                    Ok(p) => chain.push(Box::new(p)),
                    Err(e) => info!(error = %e, "local embedding model unavailable, will fall through chain"),
                }
            }
            EmbeddingMode::Remote => {
                let endpoint = config
                    .endpoint
                    .clone()
                    .ok_or_else(|| EmbeddingError::ProviderUnavailable { provider: "remote".to_string() })?;
                let api_key = std::env::var("SUCC_EMBEDDING_API_KEY").unwrap_or_default();
                chain.push(Box::new(RemoteProvider::new(
                    config.model.clone(),
                    api_key,
                    endpoint,
                    config.dimension,
                )));
            }
        }

        // Always-available last resort.
        chain.push(Box::new(HashingFallback::new(config.dimension)));

        let cache = match l2_cache {
            Some(l2) => CacheCoordinator::with_l2(10_000, l2),
            None => CacheCoordinator::new(10_000),
        };

        let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let pool_size = worker_pool::auto_tune_pool_size(cpus, free_memory_bytes_estimate());
        let pool = WorkerPool::new(pool_size)?;

        info!(pool_size, dims = config.dimension, "embedding engine initialized");

        Ok(Self { chain: Mutex::new(chain), cache, pool, dimensions: config.dimension })
    }

    fn content_hash(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    fn embed_uncached(&self, text: &str) -> SuccResult<Vec<f32>> {
        let mut chain = self.chain.lock().expect("degradation chain mutex poisoned");
        let (vec, _provider) = chain.embed(text)?;
        if vec.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch { expected: self.dimensions, actual: vec.len() }.into());
        }
        Ok(vec)
    }

    /// Degradation events accumulated since the last drain — surfaced by
    /// the observability layer.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.lock().expect("degradation chain mutex poisoned").drain_events()
    }

    pub fn active_provider(&self) -> String {
        self.chain.lock().expect("degradation chain mutex poisoned").active_provider_name().to_string()
    }

    pub fn worker_pool_size(&self) -> usize {
        self.pool.size()
    }
}

impl Embedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> SuccResult<Vec<f32>> {
        let hash = Self::content_hash(text);
        let (cached, _tier) = self.cache.get(&hash);
        if let Some(v) = cached {
            return Ok(v);
        }

        let vec = self.embed_uncached(text)?;
        self.cache.put(hash, &vec);
        Ok(vec)
    }

    fn embed_batch(&self, texts: &[String]) -> SuccResult<Vec<Vec<f32>>> {
        let mut to_compute = Vec::new();
        let mut results: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());

        for text in texts {
            let hash = Self::content_hash(text);
            let (cached, _tier) = self.cache.get(&hash);
            if let Some(v) = cached {
                results.push(Some(v));
            } else {
                to_compute.push((results.len(), hash));
                results.push(None);
            }
        }

        if !to_compute.is_empty() {
            // `DegradationChain::embed_batch` hands the whole batch to
            // whichever provider is active; the worker pool (`embed_parallel`)
            // is for callers that want raw provider-level fan-out without
            // going through the cache/chain path at all.
            let pending_texts: Vec<String> = to_compute.iter().map(|(idx, _)| texts[*idx].clone()).collect();
            let mut chain = self.chain.lock().expect("degradation chain mutex poisoned");
            let (vecs, _provider) = chain.embed_batch(&pending_texts)?;
            drop(chain);

            if vecs.len() != pending_texts.len() {
                return Err(EmbeddingError::InferenceFailed {
                    reason: "provider returned a different batch size than requested".to_string(),
                }
                .into());
            }

            for ((idx, hash), vec) in to_compute.into_iter().zip(vecs.into_iter()) {
                if vec.len() != self.dimensions {
                    return Err(
                        EmbeddingError::DimensionMismatch { expected: self.dimensions, actual: vec.len() }.into()
                    );
                }
                self.cache.put(hash, &vec);
                results[idx] = Some(vec);
            }
        }

        Ok(results.into_iter().map(|r| r.expect("every slot filled by cache or compute pass")).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "succ-embedding-engine"
    }

    fn is_available(&self) -> bool {
        true
    }
}

fn free_memory_bytes_estimate() -> u64 {
    // No portable stdlib way to read free memory without a sysinfo-style
    // dependency the teacher doesn't carry; assume comfortably above the
    // per-worker budget so sizing falls back to the cpu/hard-cap terms.
    succ_core::constants::EMBEDDING_WORKER_MEM_BUDGET_BYTES * (MAX_EMBEDDING_POOL_WORKERS as u64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EmbeddingEngine {
        let config = EmbeddingConfig { mode: EmbeddingMode::Remote, model: "irrelevant".to_string(), dimension: 32, endpoint: Some("http://127.0.0.1:0".to_string()) };
        EmbeddingEngine::new(&config, None, None).unwrap()
    }

    #[test]
    fn falls_back_to_hashing_when_remote_unreachable() {
        let engine = engine();
        let vec = engine.embed("hello world").unwrap();
        assert_eq!(vec.len(), 32);
    }

    #[test]
    fn same_text_is_cached() {
        let engine = engine();
        let a = engine.embed("cached text").unwrap();
        let b = engine.embed("cached text").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degradation_event_recorded_on_fallback() {
        let engine = engine();
        engine.embed("anything").unwrap();
        let events = engine.drain_degradation_events();
        assert!(!events.is_empty());
        assert_eq!(events[0].component, "embeddings");
    }

    #[test]
    fn batch_embed_returns_matching_dimensions() {
        let engine = engine();
        let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let vecs = engine.embed_batch(&texts).unwrap();
        assert_eq!(vecs.len(), 3);
        assert!(vecs.iter().all(|v| v.len() == 32));
    }

    #[test]
    fn batch_embed_reuses_cache_for_repeated_texts() {
        let engine = engine();
        let texts = vec!["dup".to_string(), "dup".to_string(), "unique".to_string()];
        let vecs = engine.embed_batch(&texts).unwrap();
        assert_eq!(vecs[0], vecs[1]);
    }
}
