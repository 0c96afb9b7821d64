use async_trait::async_trait;

use crate::errors::SuccResult;

/// Chat-completion / extraction capability (C8/C7 callers only).
/// Deliberately out of scope per spec.md §1 — cloud chat completion or
/// remote API callers are injected. Every method is async: LLM calls
/// are an explicit suspension point (spec.md §5, §9).
#[async_trait]
pub trait Llm: Send + Sync {
    /// Free-form completion used by reflection synthesis, query
    /// expansion, and relation classification. `timeout_secs` is
    /// enforced by the caller, not the implementation, so a slow
    /// provider can still be cancelled at the component boundary.
    async fn complete(&self, prompt: &str, timeout_secs: u64) -> SuccResult<String>;

    fn name(&self) -> &str;
}
