//! Fallback chain over `Provider`s. Every fallback past the primary is
//! logged as a `DegradationEvent` so degraded-mode operation is visible
//! to the observability layer instead of silent.

use chrono::Utc;
use succ_core::errors::{EmbeddingError, SuccResult};
use succ_core::models::DegradationEvent;
use tracing::warn;

use crate::providers::Provider;

struct ChainEntry {
    provider: Box<dyn Provider>,
}

pub struct DegradationChain {
    chain: Vec<ChainEntry>,
    events: Vec<DegradationEvent>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    pub fn new() -> Self {
        Self { chain: Vec::new(), events: Vec::new() }
    }

    pub fn push(&mut self, provider: Box<dyn Provider>) {
        self.chain.push(ChainEntry { provider });
    }

    /// Try the chain without event tracking, for contexts that only have
    /// `&self` access (the `Embedder` impl on `EmbeddingEngine` locks a
    /// mutex instead, so this is mostly useful for read-only probes).
    pub fn embed_readonly(&self, text: &str) -> SuccResult<Vec<f32>> {
        for entry in &self.chain {
            if !entry.provider.is_available() {
                continue;
            }
            if let Ok(v) = entry.provider.embed(text) {
                return Ok(v);
            }
        }
        Err(EmbeddingError::ProviderUnavailable {
            provider: format!("all {} providers failed", self.chain.len()),
        }
        .into())
    }

    pub fn embed(&mut self, text: &str) -> SuccResult<(Vec<f32>, String)> {
        let mut last_error = None;

        for i in 0..self.chain.len() {
            if !self.chain[i].provider.is_available() {
                continue;
            }

            match self.chain[i].provider.embed(text) {
                Ok(vec) => {
                    let name = self.chain[i].provider.name().to_string();
                    if i > 0 {
                        self.log_fallback(&name);
                    }
                    return Ok((vec, name));
                }
                Err(e) => {
                    warn!(provider = self.chain[i].provider.name(), error = %e, "provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable { provider: "all providers exhausted".to_string() }.into()
        }))
    }

    pub fn embed_batch(&mut self, texts: &[String]) -> SuccResult<(Vec<Vec<f32>>, String)> {
        let mut last_error = None;

        for i in 0..self.chain.len() {
            if !self.chain[i].provider.is_available() {
                continue;
            }

            match self.chain[i].provider.embed_batch(texts) {
                Ok(vecs) => {
                    let name = self.chain[i].provider.name().to_string();
                    if i > 0 {
                        self.log_fallback(&name);
                    }
                    return Ok((vecs, name));
                }
                Err(e) => {
                    warn!(provider = self.chain[i].provider.name(), error = %e, "batch embed failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable { provider: "all providers exhausted".to_string() }.into()
        }))
    }

    fn log_fallback(&mut self, fallback_used: &str) {
        let primary_name = self.chain.first().map(|e| e.provider.name()).unwrap_or("unknown");
        self.events.push(DegradationEvent {
            component: "embeddings".to_string(),
            failure: format!("{primary_name} unavailable"),
            fallback_used: fallback_used.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|e| e.provider.is_available())
            .map(|e| e.provider.name())
            .unwrap_or("none")
    }

    pub fn drain_events(&mut self) -> Vec<DegradationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;
    impl Provider for FailingProvider {
        fn embed(&self, _text: &str) -> SuccResult<Vec<f32>> {
            Err(EmbeddingError::InferenceFailed { reason: "mock failure".to_string() }.into())
        }
        fn dimensions(&self) -> usize {
            128
        }
        fn name(&self) -> &str {
            "failing-mock"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    struct SuccessProvider {
        name: String,
        dims: usize,
    }
    impl Provider for SuccessProvider {
        fn embed(&self, _text: &str) -> SuccResult<Vec<f32>> {
            Ok(vec![1.0; self.dims])
        }
        fn dimensions(&self) -> usize {
            self.dims
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn primary_succeeds_no_degradation() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(SuccessProvider { name: "primary".to_string(), dims: 128 }));
        chain.push(Box::new(SuccessProvider { name: "fallback".to_string(), dims: 128 }));

        let (vec, name) = chain.embed("test").unwrap();
        assert_eq!(name, "primary");
        assert_eq!(vec.len(), 128);
        assert!(chain.drain_events().is_empty());
    }

    #[test]
    fn fallback_on_primary_failure() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        chain.push(Box::new(SuccessProvider { name: "fallback".to_string(), dims: 64 }));

        let (vec, name) = chain.embed("test").unwrap();
        assert_eq!(name, "fallback");
        assert_eq!(vec.len(), 64);

        let events = chain.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fallback_used, "fallback");
    }

    #[test]
    fn all_fail_returns_error() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        chain.push(Box::new(FailingProvider));
        assert!(chain.embed("test").is_err());
    }

    #[test]
    fn batch_fallback() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        chain.push(Box::new(SuccessProvider { name: "batch-fallback".to_string(), dims: 32 }));

        let texts = vec!["a".to_string(), "b".to_string()];
        let (vecs, name) = chain.embed_batch(&texts).unwrap();
        assert_eq!(name, "batch-fallback");
        assert_eq!(vecs.len(), 2);
    }
}
