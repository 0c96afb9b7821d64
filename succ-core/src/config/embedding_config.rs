use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    Local,
    Remote,
}

impl Default for EmbeddingMode {
    fn default() -> Self {
        EmbeddingMode::Local
    }
}

/// Selects the Embedder (C2). `dimension` is fixed at project init —
/// mixing dimensions is rejected at write time (spec.md §3).
///
/// `endpoint` is only consulted in `Remote` mode; the API key itself is
/// never stored here — it's read from `SUCC_EMBEDDING_API_KEY` at
/// provider construction time so it never round-trips through a config
/// file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub mode: EmbeddingMode,
    pub model: String,
    pub dimension: usize,
    pub endpoint: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            mode: EmbeddingMode::default(),
            model: "local-minilm".to_string(),
            dimension: defaults::DEFAULT_EMBEDDING_DIMENSION,
            endpoint: None,
        }
    }
}
