mod hashing_fallback;
mod local;
mod remote;

pub use hashing_fallback::HashingFallback;
pub use local::LocalProvider;
pub use remote::RemoteProvider;

use succ_core::errors::SuccResult;

/// Internal provider seam the degradation chain dispatches over. Not the
/// public `Embedder` trait (C2) — `EmbeddingEngine` is the thing that
/// implements that, by driving a chain of these.
pub trait Provider: Send + Sync {
    fn embed(&self, text: &str) -> SuccResult<Vec<f32>>;
    fn embed_batch(&self, texts: &[String]) -> SuccResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
    fn dimensions(&self) -> usize;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
}
